//! Error types for camcalib.

use thiserror::Error;

/// The main error type for camcalib operations.
#[derive(Error, Debug)]
pub enum CamCalibError {
    /// An option value is outside of its valid range.
    #[error("invalid option '{name}': {reason}")]
    InvalidOption { name: &'static str, reason: String },

    /// Rendering error.
    #[error("render error: {0}")]
    RenderError(String),

    /// Window or event loop error.
    #[error("window error: {0}")]
    WindowError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for camcalib operations.
pub type Result<T> = std::result::Result<T, CamCalibError>;
