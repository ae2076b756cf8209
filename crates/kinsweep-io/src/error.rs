//! Error types for cloud persistence.

use thiserror::Error;

/// Errors from writing or reading point cloud files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Underlying file system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failure, including grids whose occupancy
    /// does not match their dimensions.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown or unsupported output format.
    #[error("format error: {0}")]
    Format(String),
}

/// Result type for cloud persistence.
pub type Result<T> = std::result::Result<T, WriteError>;
