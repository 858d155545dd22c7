//! GPU texture management.

use pixelflow_core::{ImageBuffer, PixelFlowError, PixelFormat, Result};

use crate::context::ComputeContext;

/// A GPU-resident 2D texture with its default view and dimensions.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
}

impl GpuTexture {
    /// Create a new GPU texture with the given dimensions.
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
        label: Option<&str>,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width,
            height,
            format,
        }
    }

    /// Texture for a static source image: sampled by filters, uploaded once.
    pub fn source_texture(device: &wgpu::Device, width: u32, height: u32) -> Self {
        Self::new(
            device,
            width,
            height,
            wgpu::TextureFormat::Rgba8Unorm,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            Some("Source Image Texture"),
        )
    }

    /// Output texture for a filter stage: shader read + write, plus copy
    /// source so consumers can read the result back.
    pub fn filter_output(device: &wgpu::Device, width: u32, height: u32) -> Self {
        Self::new(
            device,
            width,
            height,
            wgpu::TextureFormat::Rgba8Unorm,
            wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::STORAGE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            Some("Filter Output Texture"),
        )
    }

    /// Single-channel float texture for derived filter resources
    /// (e.g. blur weight grids).
    pub fn weight_texture(device: &wgpu::Device, side: u32) -> Self {
        Self::new(
            device,
            side,
            side,
            wgpu::TextureFormat::R32Float,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            Some("Filter Weight Texture"),
        )
    }

    /// Upload an RGBA8 image into this texture.
    pub fn upload_image(&self, queue: &wgpu::Queue, image: &ImageBuffer) -> Result<()> {
        if image.format != PixelFormat::Rgba8 || self.format != wgpu::TextureFormat::Rgba8Unorm {
            return Err(PixelFlowError::UnsupportedFormat(
                "only RGBA8 images can be uploaded to RGBA8 textures".to_string(),
            ));
        }
        if image.width != self.width || image.height != self.height {
            return Err(PixelFlowError::UnsupportedFormat(format!(
                "image size {}x{} does not match texture size {}x{}",
                image.width, image.height, self.width, self.height
            )));
        }

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.data,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.width),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );

        Ok(())
    }

    /// Upload a square float weight grid into this R32F texture.
    pub fn upload_weights(&self, queue: &wgpu::Queue, weights: &[f32]) -> Result<()> {
        if self.format != wgpu::TextureFormat::R32Float {
            return Err(PixelFlowError::UnsupportedFormat(
                "weight uploads require an R32F texture".to_string(),
            ));
        }
        if weights.len() != (self.width * self.height) as usize {
            return Err(PixelFlowError::InvalidParameter(format!(
                "weight grid length {} does not match {}x{}",
                weights.len(),
                self.width,
                self.height
            )));
        }

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(weights),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.width),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );

        Ok(())
    }

    /// Copy this texture back into CPU memory.
    ///
    /// Blocks until the copy completes. Intended for display-layer
    /// consumers and tests, not per-frame hot paths.
    pub fn read_back(&self, ctx: &ComputeContext) -> Result<ImageBuffer> {
        if self.format != wgpu::TextureFormat::Rgba8Unorm {
            return Err(PixelFlowError::UnsupportedFormat(
                "readback supports RGBA8 textures only".to_string(),
            ));
        }

        let bytes_per_row = Self::aligned_bytes_per_row(self.width);
        let staging = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("pixelflow-readback"),
            size: bytes_per_row as u64 * self.height as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("pixelflow-readback-encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &staging,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        ctx.queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = ctx.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|_| PixelFlowError::GpuExecution("readback channel closed".to_string()))?
            .map_err(|e| PixelFlowError::GpuExecution(format!("readback map failed: {e}")))?;

        let mapped = slice.get_mapped_range();
        let row_bytes = self.width as usize * 4;
        let mut image = ImageBuffer::new(self.width, self.height, PixelFormat::Rgba8);
        for y in 0..self.height as usize {
            let start = y * bytes_per_row as usize;
            image.data[y * row_bytes..(y + 1) * row_bytes]
                .copy_from_slice(&mapped[start..start + row_bytes]);
        }
        drop(mapped);
        staging.unmap();

        Ok(image)
    }

    /// Whether this texture matches the given dimensions.
    pub fn same_size(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }

    /// Memory usage estimate in bytes.
    pub fn memory_size(&self) -> usize {
        let bytes_per_pixel = match self.format {
            wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb => 4,
            wgpu::TextureFormat::R32Float => 4,
            wgpu::TextureFormat::Rgba16Float => 8,
            wgpu::TextureFormat::Rgba32Float => 16,
            _ => 4,
        };
        (self.width * self.height) as usize * bytes_per_pixel
    }

    fn aligned_bytes_per_row(width: u32) -> u32 {
        let bytes = width * 4;
        bytes.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT) * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT
    }
}
