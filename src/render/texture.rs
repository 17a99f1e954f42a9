//! Per-frame planar YUV texture
//!
//! Three single-channel textures (Y at full size, U and V at chroma size),
//! the colour conversion uniform and the bind group tying them to the
//! [`YuvRenderer`] pipeline. Dropping it releases all of them.

use wgpu::util::DeviceExt;

use crate::media::frame::chroma_extent;
use crate::media::{ColorMatrix, ColorRange, Plane, YuvFrame};

use super::{ColorParams, YuvRenderer};

/// One plane texture and its size
struct PlaneTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl PlaneTexture {
    fn new(device: &wgpu::Device, label: &str, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::COPY_DST | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width,
            height,
        }
    }

    /// Copy `plane` row by row using its stride; planes that do not match
    /// the texture are skipped
    fn write(&self, queue: &wgpu::Queue, plane: &Plane<'_>) -> bool {
        if plane.width != self.width
            || plane.height != self.height
            || plane.stride < plane.width as usize
            || plane.data.len() < plane.required_len()
        {
            return false;
        }

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &plane.data[..plane.required_len()],
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(plane.stride as u32),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        true
    }
}

/// GPU resources for one decoded frame
pub struct YuvTexture {
    planes: [PlaneTexture; 3],
    params_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

impl YuvTexture {
    /// Create textures for a `width` x `height` 4:2:0 frame
    pub fn new(device: &wgpu::Device, renderer: &YuvRenderer, width: u32, height: u32) -> Self {
        let (chroma_width, chroma_height) = chroma_extent(width, height);
        let planes = [
            PlaneTexture::new(device, "Y Plane", width, height),
            PlaneTexture::new(device, "U Plane", chroma_width, chroma_height),
            PlaneTexture::new(device, "V Plane", chroma_width, chroma_height),
        ];

        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("YUV Color Params"),
            contents: bytemuck::bytes_of(&ColorParams::new(
                ColorMatrix::Bt601,
                ColorRange::Limited,
                renderer.srgb_target(),
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("YUV Bind Group"),
            layout: renderer.bind_group_layout(),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&planes[0].view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&planes[1].view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&planes[2].view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(renderer.sampler()),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: params_buffer.as_entire_binding(),
                },
            ],
        });

        Self {
            planes,
            params_buffer,
            bind_group,
            width,
            height,
        }
    }

    /// Upload the frame's planes and colour parameters
    ///
    /// Frames whose size differs from the texture are ignored.
    pub fn upload(&self, queue: &wgpu::Queue, frame: &YuvFrame<'_>, srgb_target: bool) {
        if frame.width != self.width || frame.height != self.height {
            tracing::warn!(
                "Frame size {}x{} doesn't match texture size {}x{}",
                frame.width,
                frame.height,
                self.width,
                self.height
            );
            return;
        }

        for (index, (texture, plane)) in self.planes.iter().zip(&frame.planes).enumerate() {
            if !texture.write(queue, plane) {
                tracing::trace!(plane = index, "Skipping malformed plane");
            }
        }

        let params = ColorParams::new(frame.matrix, frame.range, srgb_target);
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&params));
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
