//! Render module: wgpu presentation of planar YUV frames
//!
//! This module provides:
//! - `GpuContext`: device, queue and the window surface
//! - `YuvRenderer`: the fullscreen YUV-to-RGB pipeline
//! - `YuvTexture`: per-frame plane textures and colour uniform
//! - `WindowPresenter`: the window-backed [`crate::playback::Presenter`]

pub mod color;
pub mod gpu_context;
pub mod presenter;
pub mod renderer;
pub mod texture;

pub use color::ColorParams;
pub use gpu_context::GpuContext;
pub use presenter::WindowPresenter;
pub use renderer::YuvRenderer;
pub use texture::YuvTexture;

/// Errors raised while creating the accelerated renderer
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The window surface could not be created
    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    /// The surface reports no usable texture format for the adapter
    #[error("Surface is not supported by the selected adapter")]
    IncompatibleSurface,
    /// No hardware adapter can present to the window
    #[error("No accelerated GPU adapter available")]
    NoAdapter,
    /// The adapter refused to create a device
    #[error("Failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}
