//! Filesystem-based storage implementation

mod mod_time;

use crate::{BodyStream, Storage, StorageError, StoredFile};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::file_utils::validate_relative_path;
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Filesystem-based storage implementation
pub struct FilesystemStorage {
    root: PathBuf,
}

impl FilesystemStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the storage root if it is missing
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let storage = Self::new(root);
        tokio::fs::create_dir_all(&storage.root)
            .await
            .map_err(|e| StorageError::io("Failed to create storage root", e))?;
        Ok(storage)
    }

    /// Map a validated slash-separated relative path onto the root
    pub fn resolve(&self, relative_path: &str) -> Result<PathBuf, StorageError> {
        validate_relative_path(relative_path).map_err(|source| StorageError::InvalidPath {
            path: relative_path.to_string(),
            source,
        })?;
        Ok(relative_path
            .split('/')
            .fold(self.root.clone(), |path, segment| path.join(segment)))
    }
}

#[async_trait(?Send)]
impl Storage for FilesystemStorage {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn store_file(
        &self,
        relative_path: &str,
        mut body: BodyStream<'_>,
        mod_time: Option<DateTime<Utc>>,
    ) -> Result<StoredFile, StorageError> {
        let file_path = self.resolve(relative_path)?;

        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io("Create failed", e))?;
        }

        let mut file = tokio::fs::File::create(&file_path)
            .await
            .map_err(|e| StorageError::io("Create failed", e))?;

        let mut bytes_written = 0u64;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| StorageError::io("Write failed", e))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| StorageError::io("Write failed", e))?;
            bytes_written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| StorageError::io("Write failed", e))?;
        drop(file);

        debug!(path = ?file_path, bytes_written, "Stored file");

        if let Some(mod_time) = mod_time {
            // Timestamps are best effort, the content is already on disk
            if let Err(e) = mod_time::apply(&file_path, mod_time) {
                warn!(path = ?file_path, error = %e, "Failed to set modification time");
            }
        }

        Ok(StoredFile {
            path: file_path,
            bytes_written,
        })
    }
}
