// this_file: crates/vgfit-core/src/surface.rs

//! Conversion of rendered f32 buffers into 8-bit surfaces and PNG files.

use crate::Result;
use std::path::Path;

/// 8-bit RGBA surface produced from a rendered frame.
#[derive(Debug, Clone)]
pub struct RenderSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RenderSurface {
    /// Quantize an interleaved RGB f32 buffer in [0, 1] into an opaque surface.
    pub fn from_rgb_f32(width: u32, height: u32, pixels: &[f32]) -> Self {
        debug_assert_eq!(pixels.len(), (width as usize) * (height as usize) * 3);
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for rgb in pixels.chunks_exact(3) {
            for &channel in rgb {
                data.push((channel.clamp(0.0, 1.0) * 255.0).round() as u8);
            }
            data.push(255);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Encode the surface as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.data)?;
        } // writer and encoder are dropped here
        Ok(png_data)
    }

    /// Encode and write the surface to a PNG file.
    pub fn write_png(&self, path: &Path) -> Result<()> {
        let bytes = self.to_png_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
