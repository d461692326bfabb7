// this_file: crates/vgfit-core/src/error.rs

//! Error types for vgfit.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for vgfit operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Input image could not be opened or decoded
    #[error("Failed to load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    /// Input image has no usable pixels
    #[error("Image {path} has zero area after preprocessing")]
    EmptyImage { path: PathBuf },

    /// Invalid fitting configuration
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Invalid color specification (e.g. a malformed hex string)
    #[error("Invalid color '{value}': {reason}")]
    InvalidColor { value: String, reason: String },

    /// Scene cannot be rendered
    #[error("Render error: {reason}")]
    Render { reason: String },

    /// PNG encoding error
    #[error("PNG encode error: {0}")]
    PngEncode(#[from] png::EncodingError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Convenience constructor for render failures.
    pub fn render(reason: impl Into<String>) -> Self {
        Error::Render {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for configuration failures.
    pub fn config(reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            reason: reason.into(),
        }
    }
}
