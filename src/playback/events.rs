//! Input events consumed by the playback loop

use winit::keyboard::KeyCode;

/// A user request recognised by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Close the window and shut down
    Quit,
    /// Flip the audio pause flag
    TogglePause,
    /// Jump back by the seek step
    SeekBackward,
    /// Jump ahead by the seek step
    SeekForward,
}

impl InputEvent {
    /// Map a pressed key to its event; other keys are ignored
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Escape => Some(InputEvent::Quit),
            KeyCode::Space => Some(InputEvent::TogglePause),
            KeyCode::ArrowLeft => Some(InputEvent::SeekBackward),
            KeyCode::ArrowRight => Some(InputEvent::SeekForward),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(InputEvent::from_key(KeyCode::Space), Some(InputEvent::TogglePause));
        assert_eq!(InputEvent::from_key(KeyCode::ArrowLeft), Some(InputEvent::SeekBackward));
        assert_eq!(InputEvent::from_key(KeyCode::ArrowRight), Some(InputEvent::SeekForward));
        assert_eq!(InputEvent::from_key(KeyCode::Escape), Some(InputEvent::Quit));
    }

    #[test]
    fn test_unmapped_keys_are_ignored() {
        assert_eq!(InputEvent::from_key(KeyCode::KeyQ), None);
        assert_eq!(InputEvent::from_key(KeyCode::ArrowUp), None);
        assert_eq!(InputEvent::from_key(KeyCode::Enter), None);
    }
}
