//! Error types module
//!
//! All failures surfaced by the gallery are unified under the `AppError` enum:
//! validation rejections, missing records/files, storage and database
//! failures, and image decode errors. Conversions from the lower-level error
//! types live next to those types; this module only carries the conversions
//! from common third-party errors.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Unsupported content type or extension. Raised before any side effect.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unknown uuid, or a referenced original file missing from disk.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Disk write/move/read failure in the media store.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The uploaded bytes could not be decoded as an image.
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the error type name for logging and response mapping
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Validation",
            AppError::NotFound(_) => "NotFound",
            AppError::Storage(_) => "Storage",
            AppError::ImageDecode(_) => "ImageDecode",
            AppError::Database(_) => "Database",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Whether the caller can recover by resubmitting a corrected request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::Validation(_) | AppError::NotFound(_))
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::Validation(format!("UUID parsing error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
