//! Wall-clock pacing against frame timestamps

use std::time::{Duration, Instant};

/// Sleeps so that frames appear no earlier than their timestamps
///
/// No drift correction: a frame that is late is shown at once and the next
/// one is measured against the same start instant.
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    start: Instant,
}

impl FramePacer {
    /// Start the playback clock now
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Time since the clock started
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Sleep until `pts_us` microseconds after the start, if that is still
    /// at least a millisecond away
    pub fn wait_until(&self, pts_us: i64) {
        if let Some(delay) = remaining(pts_us, self.elapsed()) {
            std::thread::sleep(delay);
        }
    }
}

/// Whole milliseconds left before `pts_us`, or `None` when nothing to wait for
pub fn remaining(pts_us: i64, elapsed: Duration) -> Option<Duration> {
    let elapsed_us = i64::try_from(elapsed.as_micros()).unwrap_or(i64::MAX);
    let delay_us = pts_us.saturating_sub(elapsed_us);
    if delay_us <= 0 {
        return None;
    }
    let millis = (delay_us / 1000) as u64;
    (millis > 0).then_some(Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_in_future_waits_whole_millis() {
        let delay = remaining(40_000, Duration::from_micros(15_500));
        assert_eq!(delay, Some(Duration::from_millis(24)));
    }

    #[test]
    fn test_late_frame_does_not_wait() {
        assert_eq!(remaining(40_000, Duration::from_millis(41)), None);
        assert_eq!(remaining(40_000, Duration::from_millis(40)), None);
        assert_eq!(remaining(-5_000, Duration::ZERO), None);
    }

    #[test]
    fn test_sub_millisecond_delay_does_not_wait() {
        assert_eq!(remaining(40_000, Duration::from_micros(39_200)), None);
    }

    #[test]
    fn test_wait_for_past_frame_returns_immediately() {
        let pacer = FramePacer::start();
        let before = Instant::now();
        pacer.wait_until(i64::MIN);
        pacer.wait_until(0);
        assert!(before.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_wait_for_future_frame_sleeps() {
        let pacer = FramePacer::start();
        pacer.wait_until(20_000);
        assert!(pacer.elapsed() >= Duration::from_millis(19));
    }
}
