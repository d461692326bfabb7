// this_file: crates/vgfit-core/src/lib.rs

//! Core types and helpers for the vgfit raster-to-vector fitting engine.

pub mod color;
pub mod config;
pub mod error;
pub mod surface;
pub mod target;

pub use color::{parse_color, Rgba};
pub use config::{FitConfig, RenderConfig};
pub use error::Error;
pub use surface::RenderSurface;
pub use target::TargetImage;

/// Result type for vgfit operations.
pub type Result<T> = std::result::Result<T, Error>;
