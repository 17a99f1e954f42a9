//! Video Player Library
//!
//! A minimal video player: demuxes and decodes a file with FFmpeg and blits
//! every decoded frame to a wgpu-rendered window, pacing presentation by the
//! frame timestamps.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod playback;
pub mod render;
pub mod shaders;
pub mod telemetry;

pub use app::{run, PlayerApp};
pub use config::PlayerConfig;
pub use error::PlayerError;
pub use media::{MediaError, VideoSource, YuvFrame};
pub use playback::{FrameSource, InputEvent, LoopState, PlaybackLoop, Presenter};
pub use render::{RenderError, WindowPresenter};
