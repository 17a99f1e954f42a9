//! Media module: container demuxing and video decoding through FFmpeg
//!
//! This module provides:
//! - `VideoSource`: owns the container, the selected video stream's decoder
//!   and the reusable packet/frame buffers
//! - `YuvFrame`: borrowed planar 4:2:0 view of a decoded frame
//! - `timing`: timestamp rescaling, frame duration and seek arithmetic

pub mod frame;
pub mod source;
pub mod timing;

use std::path::PathBuf;
use std::sync::OnceLock;

pub use frame::{ColorMatrix, ColorRange, Plane, YuvFrame};
pub use source::{PacketStatus, VideoSource, VideoStreamInfo};
pub use timing::SeekDirection;

/// Errors raised while opening or driving a media source
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// Global FFmpeg initialization failed
    #[error("Failed to initialize FFmpeg: {0}")]
    Init(#[source] ffmpeg_next::Error),
    /// The input could not be opened or probed
    #[error("Could not open video file '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: ffmpeg_next::Error,
    },
    /// The container holds no video stream
    #[error("No video stream found")]
    NoVideoStream,
    /// No decoder is registered for the stream's codec
    #[error("Unsupported codec: {0:?}")]
    UnsupportedCodec(ffmpeg_next::codec::Id),
    /// The codec context could not be built or opened
    #[error("Could not open codec: {0}")]
    DecoderOpen(#[source] ffmpeg_next::Error),
    /// Pixel format conversion could not be set up or run
    #[error("Could not convert frame to YUV420P: {0}")]
    Scaler(#[source] ffmpeg_next::Error),
    /// The demuxer rejected a seek request
    #[error("Seek failed: {0}")]
    Seek(#[source] ffmpeg_next::Error),
}

static FFMPEG_INIT: OnceLock<Result<(), ffmpeg_next::Error>> = OnceLock::new();

/// Initialize FFmpeg once per process
///
/// Later calls return the outcome of the first one.
pub fn init() -> Result<(), MediaError> {
    let outcome = *FFMPEG_INIT.get_or_init(|| {
        let result = ffmpeg_next::init();
        if result.is_ok() {
            tracing::debug!("FFmpeg initialized");
        }
        result
    });
    outcome.map_err(MediaError::Init)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        assert!(init().is_ok());
        assert!(init().is_ok());
    }

    #[test]
    fn test_no_video_stream_message() {
        assert_eq!(MediaError::NoVideoStream.to_string(), "No video stream found");
    }

    #[test]
    fn test_open_error_names_path() {
        let err = MediaError::Open {
            path: PathBuf::from("/nowhere/clip.mp4"),
            source: ffmpeg_next::Error::InvalidData,
        };
        assert!(err.to_string().contains("/nowhere/clip.mp4"));
    }
}
