//! Timestamp arithmetic in stream time-base units

use ffmpeg_next::rescale::{Rescale, TIME_BASE};
use ffmpeg_next::Rational;

/// Direction of a relative seek
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekDirection {
    Backward,
    Forward,
}

fn is_valid(rational: Rational) -> bool {
    rational.numerator() > 0 && rational.denominator() > 0
}

/// Length of one frame in `time_base` ticks
///
/// One tick of the inverse frame rate rescaled into the stream time base,
/// never less than one tick. Unknown rates count as one tick per frame.
pub fn frame_duration(frame_rate: Rational, time_base: Rational) -> i64 {
    if !is_valid(frame_rate) || !is_valid(time_base) {
        return 1;
    }
    1i64.rescale(frame_rate.invert(), time_base).max(1)
}

/// Convert a timestamp from `time_base` units to microseconds
pub fn pts_to_micros(timestamp: i64, time_base: Rational) -> i64 {
    timestamp.rescale(time_base, TIME_BASE)
}

/// Target timestamp for a seek of `step_frames` frames from `current_pts`
pub fn seek_target(
    current_pts: i64,
    frame_duration: i64,
    step_frames: i64,
    direction: SeekDirection,
) -> i64 {
    let offset = frame_duration.saturating_mul(step_frames);
    match direction {
        SeekDirection::Backward => current_pts.saturating_sub(offset),
        SeekDirection::Forward => current_pts.saturating_add(offset),
    }
}
