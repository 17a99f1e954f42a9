//! Window-backed presenter
//!
//! Implements [`Presenter`] on top of the wgpu surface of the player window.
//! A frame in flight holds the acquired surface texture and an open command
//! encoder from `clear` until `present`.

use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::media::YuvFrame;
use crate::playback::Presenter;

use super::{GpuContext, RenderError, YuvRenderer, YuvTexture};

/// Surface texture and commands of the frame being drawn
struct PendingFrame {
    encoder: wgpu::CommandEncoder,
    view: wgpu::TextureView,
    output: wgpu::SurfaceTexture,
}

/// Accelerated renderer bound to the player window
///
/// Fields are declared in release order: renderer, GPU context, window.
pub struct WindowPresenter {
    pending: Option<PendingFrame>,
    renderer: YuvRenderer,
    gpu: GpuContext,
    window: Arc<Window>,
}

impl WindowPresenter {
    /// Create the renderer for `window`
    pub fn new(window: Arc<Window>) -> Result<Self, RenderError> {
        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;
        let renderer = YuvRenderer::new(&gpu.device, gpu.surface_format());

        Ok(Self {
            pending: None,
            renderer,
            gpu,
            window,
        })
    }

    /// Follow a change of the window's physical size
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.pending = None;
        self.gpu.resize(size.width, size.height);
    }
}

impl Presenter for WindowPresenter {
    type Texture = YuvTexture;

    fn clear(&mut self) {
        // A frame that was never presented is discarded
        self.pending = None;

        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("Surface lost or outdated, reconfiguring");
                self.gpu.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::trace!("Surface texture timed out");
                return;
            }
            Err(e) => {
                tracing::warn!("Failed to acquire surface texture: {}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        self.renderer.clear(&mut encoder, &view);

        self.pending = Some(PendingFrame {
            encoder,
            view,
            output,
        });
    }

    fn create_texture(&mut self, width: u32, height: u32) -> Option<YuvTexture> {
        // No target to draw into: skip the frame
        self.pending.as_ref()?;
        Some(YuvTexture::new(&self.gpu.device, &self.renderer, width, height))
    }

    fn upload(&mut self, texture: &mut YuvTexture, frame: &YuvFrame<'_>) {
        texture.upload(&self.gpu.queue, frame, self.renderer.srgb_target());
    }

    fn copy(&mut self, texture: &YuvTexture) {
        if let Some(pending) = self.pending.as_mut() {
            self.renderer
                .draw(&mut pending.encoder, &pending.view, texture);
        }
    }

    fn present(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        self.gpu
            .queue
            .submit(std::iter::once(pending.encoder.finish()));
        drop(pending.view);
        self.window.pre_present_notify();
        pending.output.present();
    }
}
