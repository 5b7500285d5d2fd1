//! File storage abstraction for booking documents
//!
//! Uploaded files are kept under generated storage names so that client
//! filenames never reach the filesystem. The original name survives only as
//! database metadata.

pub mod local;
pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

pub use local::LocalFileStorage;
pub use memory::InMemoryFileStorage;

/// A file received from a client, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-declared filename
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Outcome of persisting an uploaded file.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Generated storage locator
    pub storage_name: String,
    pub size: i64,
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Persist the file under a fresh storage name.
    async fn store(&self, file: &UploadedFile) -> DomainResult<StoredFile>;
    /// Read back a previously stored file.
    async fn load(&self, storage_name: &str) -> DomainResult<Vec<u8>>;
}

/// Generate a storage name for a client filename: a fresh UUID keeping the
/// original extension. Names containing a parent-directory sequence are
/// rejected outright.
pub fn storage_name_for(file_name: &str) -> DomainResult<String> {
    if file_name.contains("..") {
        return Err(DomainError::Storage(format!(
            "Filename contains invalid path sequence: {}",
            file_name
        )));
    }

    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext);
    Ok(match extension {
        Some(ext) if !ext.is_empty() => format!("{}.{}", Uuid::new_v4(), ext),
        _ => Uuid::new_v4().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_name_keeps_extension() {
        let name = storage_name_for("passport scan.pdf").unwrap();
        assert!(name.ends_with(".pdf"));
        assert_ne!(name, "passport scan.pdf");
    }

    #[test]
    fn storage_name_without_extension() {
        let name = storage_name_for("README").unwrap();
        assert!(!name.contains('.'));
    }

    #[test]
    fn storage_names_are_unique() {
        let a = storage_name_for("a.txt").unwrap();
        let b = storage_name_for("a.txt").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn parent_directory_sequences_are_rejected() {
        assert!(matches!(
            storage_name_for("../../etc/passwd"),
            Err(DomainError::Storage(_))
        ));
        assert!(matches!(
            storage_name_for("evil..pdf"),
            Err(DomainError::Storage(_))
        ));
    }
}
