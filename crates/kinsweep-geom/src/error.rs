//! Error types for solid construction.

use thiserror::Error;

/// Errors raised when constructing geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeomError {
    /// A construction parameter is out of range (negative radius, NaN, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The geometry is degenerate (zero-length axis, ...).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeomError>;
