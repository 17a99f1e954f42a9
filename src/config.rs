//! Player configuration
//!
//! Everything here is fixed at compile time; the player reads no settings
//! file and no environment beyond the logging filter.

use std::time::Duration;

/// Window title shown by the display surface
pub const WINDOW_TITLE: &str = "Video Player";

/// Fixed window width in logical pixels
pub const WINDOW_WIDTH: u32 = 800;

/// Fixed window height in logical pixels
pub const WINDOW_HEIGHT: u32 = 600;

/// Number of frame durations covered by one arrow-key seek
pub const SEEK_STEP_FRAMES: i64 = 10;

/// Sleep used when the demuxer has no packet to hand out
pub const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Compile-time player settings bundled for the playback loop and app shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerConfig {
    /// Window title
    pub window_title: String,
    /// Window width in logical pixels
    pub window_width: u32,
    /// Window height in logical pixels
    pub window_height: u32,
    /// Frames skipped per seek request
    pub seek_step_frames: i64,
    /// Back-off when no packet is available (zero = pure busy-poll)
    pub idle_poll_interval: Duration,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            window_title: WINDOW_TITLE.to_string(),
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            seek_step_frames: SEEK_STEP_FRAMES,
            idle_poll_interval: IDLE_POLL_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_is_800_by_600() {
        let config = PlayerConfig::default();
        assert_eq!(config.window_width, 800);
        assert_eq!(config.window_height, 600);
        assert_eq!(config.window_title, "Video Player");
    }

    #[test]
    fn test_default_seek_step() {
        assert_eq!(PlayerConfig::default().seek_step_frames, 10);
    }
}
