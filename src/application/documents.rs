//! Document upload use cases
//!
//! Documents are uploaded independently of any booking and linked later by
//! the booking service. Until then a document row exists with no booking
//! reference; nothing garbage-collects rows that never get linked.

use std::sync::Arc;

use crate::domain::{BookingDocument, BookingDocumentRepository, DomainError, DomainResult, NewDocument};
use crate::infrastructure::storage::{FileStorage, UploadedFile};

pub struct DocumentService {
    documents: Arc<dyn BookingDocumentRepository>,
    storage: Arc<dyn FileStorage>,
}

impl DocumentService {
    pub fn new(documents: Arc<dyn BookingDocumentRepository>, storage: Arc<dyn FileStorage>) -> Self {
        Self { documents, storage }
    }

    /// Store a batch of uploaded files and create their metadata rows.
    ///
    /// Files are processed in order; a storage failure aborts the batch.
    /// An empty batch is a no-op and yields an empty list.
    pub async fn upload(&self, files: Vec<UploadedFile>) -> DomainResult<Vec<BookingDocument>> {
        let mut documents = Vec::with_capacity(files.len());
        for file in files {
            let stored = self.storage.store(&file).await?;
            let document = self
                .documents
                .insert(NewDocument {
                    file_name: file.file_name,
                    file_path: stored.storage_name,
                    file_type: file.content_type,
                    file_size: stored.size,
                })
                .await?;
            documents.push(document);
        }
        Ok(documents)
    }

    pub async fn get(&self, id: i64) -> DomainResult<BookingDocument> {
        self.documents
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Document", "id", id))
    }

    /// Document metadata plus its file content, for downloads.
    pub async fn download(&self, id: i64) -> DomainResult<(BookingDocument, Vec<u8>)> {
        let document = self.get(id).await?;
        let data = self.storage.load(&document.file_path).await?;
        Ok((document, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryBookingDocumentRepository;
    use crate::infrastructure::storage::InMemoryFileStorage;

    fn service() -> (DocumentService, Arc<InMemoryFileStorage>) {
        let storage = Arc::new(InMemoryFileStorage::new());
        let documents = Arc::new(InMemoryBookingDocumentRepository::new());
        (DocumentService::new(documents, storage.clone()), storage)
    }

    fn upload_file(name: &str, data: &[u8]) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: Some("application/pdf".to_string()),
            data: data.to_vec(),
        }
    }

    #[tokio::test]
    async fn empty_batch_yields_empty_list() {
        let (service, storage) = service();
        let documents = service.upload(Vec::new()).await.unwrap();
        assert!(documents.is_empty());
        assert_eq!(storage.file_count(), 0);
    }

    #[tokio::test]
    async fn batch_produces_one_document_per_file() {
        let (service, storage) = service();
        let documents = service
            .upload(vec![
                upload_file("id-card.pdf", b"front"),
                upload_file("id-card.pdf", b"back"),
            ])
            .await
            .unwrap();

        assert_eq!(documents.len(), 2);
        assert_ne!(documents[0].id, documents[1].id);
        assert_ne!(documents[0].file_path, documents[1].file_path);
        assert!(documents.iter().all(|d| d.booking_id.is_none()));
        assert_eq!(storage.file_count(), 2);
    }

    #[tokio::test]
    async fn traversal_filename_aborts_the_batch() {
        let (service, _) = service();
        let result = service
            .upload(vec![upload_file("../../etc/shadow", b"x")])
            .await;
        assert!(matches!(result, Err(DomainError::Storage(_))));
    }

    #[tokio::test]
    async fn download_returns_metadata_and_content() {
        let (service, _) = service();
        let documents = service
            .upload(vec![upload_file("scan.pdf", b"payload")])
            .await
            .unwrap();

        let (document, data) = service.download(documents[0].id).await.unwrap();
        assert_eq!(document.file_name, "scan.pdf");
        assert_eq!(data, b"payload");
    }
}
