//! Error types for the perception and control pipeline.

use thiserror::Error;

/// Result type alias for simulation operations.
pub type DriveResult<T> = Result<T, DriveError>;

/// Errors that can occur while building or evaluating the pipeline.
///
/// Degenerate geometry is never an error: parallel segments and zero-length
/// rays simply produce no intersection.
#[derive(Debug, Error)]
pub enum DriveError {
    /// An input vector does not match the width a layer expects.
    #[error("dimension mismatch: expected {expected} inputs, got {actual}")]
    DimensionMismatch {
        /// Width the layer expects.
        expected: usize,
        /// Width that was supplied.
        actual: usize,
    },

    /// Network layers do not chain, or a network does not fit its vehicle.
    #[error("invalid network architecture: {0}")]
    InvalidArchitecture(String),

    /// Invalid sensor, vehicle, or road parameters.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Reading or writing a persisted file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted file is not valid JSON for the expected type.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DriveError {
    /// Create a dimension mismatch error.
    #[must_use]
    pub const fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create an invalid architecture error.
    #[must_use]
    pub fn invalid_architecture(details: impl Into<String>) -> Self {
        Self::InvalidArchitecture(details.into())
    }

    /// Create an invalid params error.
    #[must_use]
    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::InvalidParams(details.into())
    }
}
