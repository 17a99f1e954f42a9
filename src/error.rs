//! Top-level player error
//!
//! Every initialization failure ends up here; `main` prints it and exits
//! with a failure status.

use winit::error::{EventLoopError, OsError};

use crate::media::MediaError;
use crate::render::RenderError;

/// Exit status used for usage and initialization failures
pub const FAILURE_EXIT_CODE: i32 = -1;

/// Errors that stop the player before or while it runs
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// The display subsystem could not be initialized
    #[error("Display initialization failed: {0}")]
    DisplayInit(#[source] EventLoopError),
    /// The event loop terminated abnormally
    #[error("Event loop error: {0}")]
    EventLoop(#[source] EventLoopError),
    /// The window could not be created
    #[error("Window creation failed: {0}")]
    Window(#[from] OsError),
    /// The accelerated renderer could not be created
    #[error("Renderer creation failed: {0}")]
    Render(#[from] RenderError),
    /// Opening or probing the media failed
    #[error(transparent)]
    Media(#[from] MediaError),
}
