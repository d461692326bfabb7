// this_file: crates/vgfit-core/src/target.rs

//! Target image loading and preprocessing.
//!
//! Input rasters are decoded, converted to RGB, and downscaled so the
//! longest edge fits the configured size (never upscaled), preserving
//! aspect ratio with Lanczos3 resampling. Pixels are stored as f32 in
//! [0, 1], interleaved RGB, row-major.

use crate::{Error, Result};
use image::imageops::FilterType;
use image::DynamicImage;
use std::path::Path;

/// Preprocessed fitting target.
#[derive(Debug, Clone)]
pub struct TargetImage {
    width: u32,
    height: u32,
    pixels: Vec<f32>,
}

impl TargetImage {
    /// Load an image from disk and preprocess it to fit `max_size`.
    pub fn load(path: &Path, max_size: u32) -> Result<Self> {
        let decoded = image::open(path).map_err(|source| Error::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let target = Self::from_dynamic(decoded, max_size);
        if target.width == 0 || target.height == 0 {
            return Err(Error::EmptyImage {
                path: path.to_path_buf(),
            });
        }
        log::debug!(
            target: "vgfit::target",
            "loaded {} -> {}x{}",
            path.display(),
            target.width,
            target.height
        );
        Ok(target)
    }

    /// Preprocess an already decoded image.
    pub fn from_dynamic(decoded: DynamicImage, max_size: u32) -> Self {
        let (w, h) = (decoded.width(), decoded.height());
        // Downscale only; small inputs keep their native resolution.
        let resized = if w > max_size || h > max_size {
            decoded.resize(max_size, max_size, FilterType::Lanczos3)
        } else {
            decoded
        };

        let rgb = resized.to_rgb8();
        let (width, height) = (rgb.width(), rgb.height());
        let pixels = rgb
            .into_raw()
            .into_iter()
            .map(|v| v as f32 / 255.0)
            .collect();

        Self {
            width,
            height,
            pixels,
        }
    }

    /// Build a target directly from interleaved RGB f32 pixels.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<f32>) -> Result<Self> {
        if pixels.len() != (width as usize) * (height as usize) * 3 {
            return Err(Error::config(format!(
                "pixel buffer length {} does not match {}x{} RGB",
                pixels.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved RGB pixels in [0, 1], row-major.
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }
}
