//! CPU-side pixel buffers used for texture upload, readback and test
//! fixtures.
//!
//! Only packed single-plane formats appear here: the filter pipeline moves
//! RGBA color data and single-channel float weight grids, nothing else.

use crate::error::{PixelFlowError, Result};

/// Pixel format enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    /// 8-bit RGBA (32 bits per pixel)
    #[default]
    Rgba8,
    /// 32-bit single-channel float (filter weight grids)
    R32F,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8 => 4,
            Self::R32F => 4,
        }
    }

    /// Total bytes needed for an image of this format.
    pub fn image_size(self, width: u32, height: u32) -> usize {
        (width as usize) * (height as usize) * self.bytes_per_pixel()
    }
}

/// A packed image in CPU memory.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    /// Pixel format
    pub format: PixelFormat,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Raw pixel data, tightly packed (no row padding)
    pub data: Vec<u8>,
}

impl ImageBuffer {
    /// Create a zero-filled image with the given dimensions and format.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            format,
            width,
            height,
            data: vec![0u8; format.image_size(width, height)],
        }
    }

    /// Wrap raw RGBA8 data. Fails if the data length does not match the
    /// dimensions.
    pub fn from_rgba8(data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected = PixelFormat::Rgba8.image_size(width, height);
        if data.len() != expected {
            return Err(PixelFlowError::InvalidParameter(format!(
                "RGBA8 data length {} does not match {}x{} (expected {})",
                data.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self {
            format: PixelFormat::Rgba8,
            width,
            height,
            data,
        })
    }

    /// A solid-color RGBA8 image.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut image = Self::new(width, height, PixelFormat::Rgba8);
        for pixel in image.data.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
        image
    }

    /// A color-bars test image (8 vertical bars).
    pub fn test_pattern(width: u32, height: u32) -> Self {
        let colors: [[u8; 4]; 8] = [
            [255, 255, 255, 255], // White
            [255, 255, 0, 255],   // Yellow
            [0, 255, 255, 255],   // Cyan
            [0, 255, 0, 255],     // Green
            [255, 0, 255, 255],   // Magenta
            [255, 0, 0, 255],     // Red
            [0, 0, 255, 255],     // Blue
            [0, 0, 0, 255],       // Black
        ];

        let mut image = Self::new(width, height, PixelFormat::Rgba8);
        for y in 0..height {
            for x in 0..width {
                let bar = (x * 8 / width.max(1)).min(7) as usize;
                let i = ((y * width + x) * 4) as usize;
                image.data[i..i + 4].copy_from_slice(&colors[bar]);
            }
        }
        image
    }

    /// Read one RGBA8 pixel.
    ///
    /// Out-of-range coordinates or a non-RGBA8 buffer return None.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if self.format != PixelFormat::Rgba8 || x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Total memory usage in bytes.
    pub fn memory_size(&self) -> usize {
        self.data.len()
    }
}
