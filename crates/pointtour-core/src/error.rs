//! Error types for pointtour.

use thiserror::Error;

/// The main error type for pointtour operations.
#[derive(Error, Debug)]
pub enum TourError {
    /// A PLY file could not be interpreted as a colored point cloud.
    #[error("PLY error: {0}")]
    Ply(String),

    /// A camera record carried a rotation that is not a usable 3x3 rotation.
    #[error("invalid rotation matrix: {0}")]
    InvalidRotation(String),

    /// A camera record carried a malformed center or translation.
    #[error("invalid camera pose: {0}")]
    InvalidPose(String),

    /// A marker index was out of range.
    #[error("marker {0} not found")]
    MarkerNotFound(usize),

    /// A configuration value was rejected by validation.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for pointtour operations.
pub type Result<T> = std::result::Result<T, TourError>;
