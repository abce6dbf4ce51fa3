//! # AppError
//!
//! Centralized error handling for the TwinView crates.
//! Maps repository and thumbnail failures to actionable error types.

use thiserror::Error;

/// The primary error type for all tv-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Image)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., empty upload batch, unsupported file type)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Bytes could not be decoded as a raster image
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Preview could not be re-encoded
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Infrastructure failure (e.g., poisoned lock, worker pool gone)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a missing image.
    pub fn image_not_found(id: impl ToString) -> Self {
        AppError::NotFound("Image".to_string(), id.to_string())
    }
}

/// A specialized Result type for TwinView logic.
pub type Result<T> = std::result::Result<T, AppError>;
