//! Filesystem-backed document storage

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use crate::domain::{DomainError, DomainResult};

use super::{storage_name_for, FileStorage, StoredFile, UploadedFile};

/// Stores documents as flat files under a configured directory.
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    /// Create the storage, making sure the target directory exists.
    pub fn new(root: impl Into<PathBuf>) -> DomainResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .map_err(|e| DomainError::Storage(format!("Could not create upload directory: {}", e)))?;
        Ok(Self { root })
    }

    fn path_for(&self, storage_name: &str) -> PathBuf {
        self.root.join(storage_name)
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(&self, file: &UploadedFile) -> DomainResult<StoredFile> {
        let storage_name = storage_name_for(&file.file_name)?;
        let path = self.path_for(&storage_name);
        let data = file.data.clone();

        tokio::task::spawn_blocking(move || std::fs::write(&path, &data))
            .await
            .map_err(|e| DomainError::Storage(format!("Storage task failed: {}", e)))?
            .map_err(|e| DomainError::Storage(format!("Could not store file: {}", e)))?;

        info!(file_name = %file.file_name, storage_name = %storage_name, "stored document");
        Ok(StoredFile {
            storage_name,
            size: file.data.len() as i64,
        })
    }

    async fn load(&self, storage_name: &str) -> DomainResult<Vec<u8>> {
        // Defense in depth: stored names are UUID-based, but never follow
        // a client-supplied locator out of the root.
        if storage_name.contains("..") || storage_name.contains('/') {
            return Err(DomainError::Storage(format!(
                "Invalid storage name: {}",
                storage_name
            )));
        }

        let path = self.path_for(storage_name);
        let name = storage_name.to_string();
        tokio::task::spawn_blocking(move || std::fs::read(&path))
            .await
            .map_err(|e| DomainError::Storage(format!("Storage task failed: {}", e)))?
            .map_err(|_| DomainError::not_found("File", "name", name))
    }
}
