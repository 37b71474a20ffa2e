//! Storage abstraction trait
//!
//! This module defines the MediaStore trait the ingestion pipeline writes
//! through, so the orchestrator never touches filesystem paths directly.

use async_trait::async_trait;
use pictura_core::AppError;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Move to trash failed: {0}")]
    MoveFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid media path: {0}")]
    InvalidPath(String),

    #[error("Storage configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(path) => AppError::NotFound(path),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Media store abstraction
///
/// Backends own the media and trash roots and perform all path resolution.
/// Every path argument is relative to the media root.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Write a file at the given relative path, creating missing parent
    /// directories (the date bucket) on demand.
    async fn write(&self, path: &str, data: &[u8]) -> StorageResult<()>;

    /// Read a file's bytes. A missing file is `StorageError::NotFound`,
    /// distinct from an I/O failure.
    async fn read(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Check whether a file exists.
    async fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Size in bytes of an existing file.
    async fn file_size(&self, path: &str) -> StorageResult<u64>;

    /// Move a file into the trash tree under its basename alone, flattening
    /// any directory structure. Returns whether the file existed and was
    /// moved; a missing file yields `Ok(false)`, not an error.
    async fn move_to_trash(&self, path: &str) -> StorageResult<bool>;
}
