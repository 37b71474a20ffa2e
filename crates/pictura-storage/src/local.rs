use crate::traits::{MediaStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem media store: an active media root plus a trash root.
#[derive(Clone)]
pub struct LocalStore {
    media_root: PathBuf,
    trash_root: PathBuf,
}

impl LocalStore {
    /// Create a new LocalStore, creating both roots if absent.
    pub async fn new(
        media_root: impl Into<PathBuf>,
        trash_root: impl Into<PathBuf>,
    ) -> StorageResult<Self> {
        let media_root = media_root.into();
        let trash_root = trash_root.into();

        for root in [&media_root, &trash_root] {
            fs::create_dir_all(root).await.map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create storage directory {}: {}",
                    root.display(),
                    e
                ))
            })?;
        }

        Ok(LocalStore {
            media_root,
            trash_root,
        })
    }

    /// Resolve a relative media path to a filesystem path, rejecting
    /// traversal sequences and absolute paths.
    fn resolve(&self, path: &str) -> StorageResult<PathBuf> {
        if path.is_empty()
            || path.starts_with('/')
            || path.split('/').any(|segment| segment == "..")
        {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.media_root.join(path))
    }

    async fn ensure_parent_dir(path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl MediaStore for LocalStore {
    async fn write(&self, path: &str, data: &[u8]) -> StorageResult<()> {
        let full = self.resolve(path)?;
        Self::ensure_parent_dir(&full).await?;

        let mut file = fs::File::create(&full).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create {}: {}", full.display(), e))
        })?;
        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write {}: {}", full.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync {}: {}", full.display(), e))
        })?;

        tracing::info!(
            path = %full.display(),
            size_bytes = data.len(),
            "Media file written"
        );

        Ok(())
    }

    async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        let full = self.resolve(path)?;

        if !fs::try_exists(&full).await.unwrap_or(false) {
            return Err(StorageError::NotFound(path.to_string()));
        }

        let data = fs::read(&full).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read {}: {}", full.display(), e))
        })?;

        Ok(data)
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let full = self.resolve(path)?;
        Ok(fs::try_exists(&full).await.unwrap_or(false))
    }

    async fn file_size(&self, path: &str) -> StorageResult<u64> {
        let full = self.resolve(path)?;
        let meta = fs::metadata(&full).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(path.to_string())
            } else {
                StorageError::ReadFailed(e.to_string())
            }
        })?;
        Ok(meta.len())
    }

    async fn move_to_trash(&self, path: &str) -> StorageResult<bool> {
        let full = self.resolve(path)?;

        if !fs::try_exists(&full).await.unwrap_or(false) {
            return Ok(false);
        }

        let basename = full
            .file_name()
            .ok_or_else(|| StorageError::InvalidPath(path.to_string()))?;
        let target = self.trash_root.join(basename);

        // rename does not cross filesystems; fall back to copy + remove.
        if fs::rename(&full, &target).await.is_err() {
            fs::copy(&full, &target).await.map_err(|e| {
                StorageError::MoveFailed(format!(
                    "Failed to copy {} to trash: {}",
                    full.display(),
                    e
                ))
            })?;
            fs::remove_file(&full).await.map_err(|e| {
                StorageError::MoveFailed(format!("Failed to remove {}: {}", full.display(), e))
            })?;
        }

        tracing::info!(
            path = %full.display(),
            trash = %target.display(),
            "Media file moved to trash"
        );

        Ok(true)
    }
}
