// this_file: crates/vgfit-core/src/config.rs

//! Fitting and rendering configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Rasterizer settings shared by fitting and preview rendering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Subpixel samples per axis (2 means a 2x2 grid per pixel)
    pub samples: u32,
    /// Antialias radius in pixels; coverage is smoothed over this band
    pub aa_radius: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples: 2,
            aa_radius: 1.0,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 || self.samples > 8 {
            return Err(Error::config(format!(
                "samples must be in 1..=8, got {}",
                self.samples
            )));
        }
        if !self.aa_radius.is_finite() || self.aa_radius < 0.0 {
            return Err(Error::config(format!(
                "aa_radius must be finite and >= 0, got {}",
                self.aa_radius
            )));
        }
        Ok(())
    }
}

/// Full configuration for one fitting run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitConfig {
    /// Number of Bezier paths to fit
    pub paths: usize,
    /// Cubic segments per path
    pub segments: usize,
    /// Optimization iterations
    pub iters: usize,
    /// Target canvas size (longest image edge after preprocessing)
    pub size: u32,
    /// Seed for the deterministic initializer
    pub seed: u64,
    /// Adam learning rate for control points (pixels)
    pub point_lr: f32,
    /// Adam learning rate for fill colors
    pub color_lr: f32,
    /// Log the loss every this many iterations (0 disables)
    pub log_every: usize,
    /// Write an intermediate PNG every this many iterations (0 disables)
    pub snapshot_every: usize,
    /// Rasterizer settings
    pub render: RenderConfig,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            paths: 128,
            segments: 1,
            iters: 500,
            size: 256,
            seed: 4,
            point_lr: 1.0,
            color_lr: 0.01,
            log_every: 50,
            snapshot_every: 0,
            render: RenderConfig::default(),
        }
    }
}

impl FitConfig {
    pub fn validate(&self) -> Result<()> {
        if self.paths == 0 {
            return Err(Error::config("paths must be at least 1"));
        }
        if self.segments == 0 {
            return Err(Error::config("segments must be at least 1"));
        }
        if self.iters == 0 {
            return Err(Error::config("iters must be at least 1"));
        }
        if self.size < 16 {
            return Err(Error::config(format!(
                "size must be at least 16, got {}",
                self.size
            )));
        }
        if !(self.point_lr > 0.0) || !(self.color_lr > 0.0) {
            return Err(Error::config("learning rates must be positive"));
        }
        self.render.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(FitConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_paths() {
        let cfg = FitConfig {
            paths: 0,
            ..FitConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_samples() {
        let cfg = FitConfig {
            render: RenderConfig {
                samples: 0,
                aa_radius: 1.0,
            },
            ..FitConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = FitConfig {
            render: RenderConfig {
                samples: 16,
                aa_radius: 1.0,
            },
            ..FitConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_nan_aa() {
        let cfg = RenderConfig {
            samples: 2,
            aa_radius: f32::NAN,
        };
        assert!(cfg.validate().is_err());
    }
}
