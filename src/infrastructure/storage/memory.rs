//! In-memory file storage for tests

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{DomainError, DomainResult};

use super::{storage_name_for, FileStorage, StoredFile, UploadedFile};

/// Keeps stored files in a map instead of on disk.
pub struct InMemoryFileStorage {
    files: DashMap<String, Vec<u8>>,
}

impl InMemoryFileStorage {
    pub fn new() -> Self {
        Self {
            files: DashMap::new(),
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

impl Default for InMemoryFileStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileStorage for InMemoryFileStorage {
    async fn store(&self, file: &UploadedFile) -> DomainResult<StoredFile> {
        let storage_name = storage_name_for(&file.file_name)?;
        self.files.insert(storage_name.clone(), file.data.clone());
        Ok(StoredFile {
            storage_name,
            size: file.data.len() as i64,
        })
    }

    async fn load(&self, storage_name: &str) -> DomainResult<Vec<u8>> {
        self.files
            .get(storage_name)
            .map(|f| f.clone())
            .ok_or_else(|| DomainError::not_found("File", "name", storage_name))
    }
}
