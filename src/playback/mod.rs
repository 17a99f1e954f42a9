//! Playback loop and the seams it drives
//!
//! The loop talks to the media side through [`FrameSource`] and to the
//! display side through [`Presenter`], so it runs the same against FFmpeg
//! and wgpu as against test doubles.

pub mod events;
pub mod pacer;
pub mod playback_loop;

use ffmpeg_next::Rational;

use crate::media::{MediaError, PacketStatus, SeekDirection, VideoSource, YuvFrame};

pub use events::InputEvent;
pub use pacer::FramePacer;
pub use playback_loop::{LoopState, PlaybackLoop};

/// Media decoding provider
pub trait FrameSource {
    /// Unit of the timestamps carried by decoded frames
    fn time_base(&self) -> Rational;

    /// One frame in time-base ticks
    fn frame_duration(&self) -> i64;

    /// Read one packet into the source's packet buffer
    fn read_packet(&mut self) -> PacketStatus;

    /// Decode the held packet, calling `on_frame` for every frame it yields
    fn decode_packet(&mut self, on_frame: &mut dyn FnMut(&YuvFrame<'_>));

    /// Release the held packet's payload
    fn release_packet(&mut self);

    /// Reposition the stream near `target` (time-base units)
    fn seek(&mut self, target: i64, direction: SeekDirection) -> Result<(), MediaError>;
}

/// Windowing and rendering provider
pub trait Presenter {
    /// Per-frame texture; dropping it destroys it
    type Texture;

    /// Clear the render target
    fn clear(&mut self);

    /// Create a planar YUV texture of the given size
    ///
    /// Returns `None` when the renderer cannot take a frame right now.
    fn create_texture(&mut self, width: u32, height: u32) -> Option<Self::Texture>;

    /// Upload the frame's three planes into `texture`
    fn upload(&mut self, texture: &mut Self::Texture, frame: &YuvFrame<'_>);

    /// Draw `texture` over the whole render target
    fn copy(&mut self, texture: &Self::Texture);

    /// Show what was drawn
    fn present(&mut self);
}

impl FrameSource for VideoSource {
    fn time_base(&self) -> Rational {
        self.stream().time_base
    }

    fn frame_duration(&self) -> i64 {
        self.stream().frame_duration()
    }

    fn read_packet(&mut self) -> PacketStatus {
        VideoSource::read_packet(self)
    }

    fn decode_packet(&mut self, on_frame: &mut dyn FnMut(&YuvFrame<'_>)) {
        VideoSource::decode_packet(self, on_frame)
    }

    fn release_packet(&mut self) {
        VideoSource::release_packet(self)
    }

    fn seek(&mut self, target: i64, direction: SeekDirection) -> Result<(), MediaError> {
        VideoSource::seek(self, target, direction)
    }
}
