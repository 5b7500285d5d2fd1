//! Booking lifecycle use cases
//!
//! Owns tracking-number sequencing: numbers are issued strictly serially
//! under a single lock that stays held from reading the highest existing
//! number until the new booking row is inserted. Concurrent creates
//! therefore always observe each other's numbers and the sequence is dense.

use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::{
    Booking, BookingDocument, BookingDocumentRepository, BookingRepository, BookingStatus,
    DomainError, DomainResult, NewBooking, ServiceRepository, TRACKING_NUMBER_PREFIX,
};
use crate::shared::pagination::{PaginatedResult, PaginationParams};

use super::notify::Notifier;

/// Client-supplied fields of a booking to create. `document_ids` carries the
/// raw strings from the request; entries that do not resolve to a stored
/// document are skipped, not rejected.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub service_id: i64,
    pub phone_number: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub notes: Option<String>,
    pub document_ids: Vec<String>,
}

pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    documents: Arc<dyn BookingDocumentRepository>,
    services: Arc<dyn ServiceRepository>,
    notifier: Arc<dyn Notifier>,
    /// Serializes tracking-number issuance. Held across the read of the
    /// highest number AND the insert of the new row.
    sequencer: Mutex<()>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        documents: Arc<dyn BookingDocumentRepository>,
        services: Arc<dyn ServiceRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            bookings,
            documents,
            services,
            notifier,
            sequencer: Mutex::new(()),
        }
    }

    /// Next tracking number, derived from the highest one already issued.
    /// Callers must hold the sequencer lock.
    async fn next_tracking_number(&self) -> DomainResult<String> {
        let next = match self.bookings.highest_tracking_number().await? {
            None => 1,
            Some(highest) => match highest
                .strip_prefix(TRACKING_NUMBER_PREFIX)
                .and_then(|n| n.parse::<u64>().ok())
            {
                Some(n) => n + 1,
                None => {
                    warn!(
                        tracking_number = %highest,
                        "unparseable tracking number, restarting sequence at 1"
                    );
                    1
                }
            },
        };
        Ok(format!("{}{:03}", TRACKING_NUMBER_PREFIX, next))
    }

    /// Create a booking, anonymously or on behalf of an account.
    ///
    /// The service must exist and be active. The new booking starts PENDING,
    /// referenced documents are linked afterwards, and the created-event
    /// notification is fired without waiting for it.
    pub async fn create(
        &self,
        request: BookingRequest,
        owner_user_id: Option<i64>,
    ) -> DomainResult<Booking> {
        let service = self
            .services
            .find_by_id(request.service_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Service", "id", request.service_id))?;
        if !service.active {
            return Err(DomainError::InvalidState(format!(
                "Service {} is not available for booking",
                service.title
            )));
        }

        let booking = {
            let _guard = self.sequencer.lock().await;
            let tracking_number = self.next_tracking_number().await?;
            self.bookings
                .insert(NewBooking {
                    tracking_number: Some(tracking_number),
                    phone_number: request.phone_number,
                    email: request.email,
                    full_name: request.full_name,
                    notes: request.notes,
                    status: BookingStatus::Pending,
                    service_id: request.service_id,
                    user_id: owner_user_id,
                })
                .await?
        };

        self.attach_documents(booking.id, &request.document_ids)
            .await?;

        let notifier = self.notifier.clone();
        let created = booking.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.booking_created(&created).await {
                warn!(
                    tracking_number = %created.tracking_number,
                    "booking-created notification failed: {}", e
                );
            }
        });

        Ok(booking)
    }

    /// Link pre-uploaded documents to a booking. Ids that do not parse, or
    /// parse but match no stored document, are logged and skipped; a bad
    /// reference never fails the creation that carried it.
    async fn attach_documents(&self, booking_id: i64, document_ids: &[String]) -> DomainResult<()> {
        for raw in document_ids {
            let document_id = match raw.trim().parse::<i64>() {
                Ok(id) => id,
                Err(_) => {
                    warn!(document_id = %raw, "skipping invalid document id");
                    continue;
                }
            };

            if self.documents.find_by_id(document_id).await?.is_none() {
                warn!(document_id, "skipping unknown document id");
                continue;
            }
            self.documents
                .attach_to_booking(document_id, booking_id)
                .await?;
        }
        Ok(())
    }

    /// Move a booking to a new status, named case-insensitively. When notes
    /// are given they replace the stored notes; otherwise the old ones stay.
    pub async fn update_status(
        &self,
        booking_id: i64,
        status: &str,
        notes: Option<String>,
    ) -> DomainResult<Booking> {
        let status = BookingStatus::from_str(status).map_err(DomainError::InvalidState)?;
        let booking = self.bookings.update_status(booking_id, status, notes).await?;

        let notifier = self.notifier.clone();
        let updated = booking.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.booking_status_changed(&updated).await {
                warn!(
                    tracking_number = %updated.tracking_number,
                    "status-change notification failed: {}", e
                );
            }
        });

        Ok(booking)
    }

    pub async fn get(&self, booking_id: i64) -> DomainResult<Booking> {
        self.bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", "id", booking_id))
    }

    /// Public lookup by tracking number.
    pub async fn track(&self, tracking_number: &str) -> DomainResult<Booking> {
        self.bookings
            .find_by_tracking_number(tracking_number)
            .await?
            .ok_or_else(|| {
                DomainError::not_found("Booking", "trackingNumber", tracking_number)
            })
    }

    pub async fn list_for_user(
        &self,
        user_id: i64,
        page: &PaginationParams,
    ) -> DomainResult<PaginatedResult<Booking>> {
        self.bookings.list_by_user(user_id, page).await
    }

    pub async fn list_by_phone_number(
        &self,
        phone_number: &str,
        page: &PaginationParams,
    ) -> DomainResult<PaginatedResult<Booking>> {
        self.bookings.list_by_phone_number(phone_number, page).await
    }

    pub async fn list_by_status(
        &self,
        status: &str,
        page: &PaginationParams,
    ) -> DomainResult<PaginatedResult<Booking>> {
        let status = BookingStatus::from_str(status).map_err(DomainError::InvalidState)?;
        self.bookings.list_by_status(status, page).await
    }

    pub async fn list_all(&self, page: &PaginationParams) -> DomainResult<PaginatedResult<Booking>> {
        self.bookings.list_all(page).await
    }

    /// Delete a booking together with its attached document rows. Stored
    /// file bytes are not reclaimed.
    pub async fn delete(&self, booking_id: i64) -> DomainResult<()> {
        self.bookings.delete(booking_id).await?;
        self.documents.delete_for_booking(booking_id).await?;
        Ok(())
    }

    pub async fn documents_for(&self, booking_id: i64) -> DomainResult<Vec<BookingDocument>> {
        // Listing documents of a missing booking is a 404, not an empty list.
        self.get(booking_id).await?;
        self.documents.list_for_booking(booking_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::notify::LogNotifier;
    use crate::domain::NewServiceOffering;
    use crate::infrastructure::memory::{
        InMemoryBookingDocumentRepository, InMemoryBookingRepository, InMemoryServiceRepository,
    };
    use async_trait::async_trait;

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn booking_created(&self, _: &Booking) -> DomainResult<()> {
            Err(DomainError::InvalidState("channel down".to_string()))
        }

        async fn booking_status_changed(&self, _: &Booking) -> DomainResult<()> {
            Err(DomainError::InvalidState("channel down".to_string()))
        }
    }

    struct Fixture {
        service: Arc<BookingService>,
        bookings: Arc<InMemoryBookingRepository>,
        documents: Arc<InMemoryBookingDocumentRepository>,
        active_service_id: i64,
        inactive_service_id: i64,
    }

    async fn fixture_with_notifier(notifier: Arc<dyn Notifier>) -> Fixture {
        let bookings = Arc::new(InMemoryBookingRepository::new());
        let documents = Arc::new(InMemoryBookingDocumentRepository::new());
        let services = Arc::new(InMemoryServiceRepository::new());

        let active = services
            .insert(NewServiceOffering {
                title: "Document notarization".to_string(),
                description: None,
                active: true,
                turnaround_time: Some("2 days".to_string()),
                price_info: None,
            })
            .await
            .unwrap();
        let inactive = services
            .insert(NewServiceOffering {
                title: "Legacy service".to_string(),
                description: None,
                active: false,
                turnaround_time: None,
                price_info: None,
            })
            .await
            .unwrap();

        let service = Arc::new(BookingService::new(
            bookings.clone(),
            documents.clone(),
            services,
            notifier,
        ));
        Fixture {
            service,
            bookings,
            documents,
            active_service_id: active.id,
            inactive_service_id: inactive.id,
        }
    }

    async fn fixture() -> Fixture {
        fixture_with_notifier(Arc::new(LogNotifier)).await
    }

    fn request(service_id: i64) -> BookingRequest {
        BookingRequest {
            service_id,
            phone_number: "+250780000000".to_string(),
            email: None,
            full_name: Some("Jane Doe".to_string()),
            notes: None,
            document_ids: Vec::new(),
        }
    }

    #[tokio::test]
    async fn sequential_creates_get_dense_sequence() {
        let f = fixture().await;
        for expected in ["PSN-001", "PSN-002", "PSN-003"] {
            let booking = f
                .service
                .create(request(f.active_service_id), None)
                .await
                .unwrap();
            assert_eq!(booking.tracking_number, expected);
            assert_eq!(booking.status, BookingStatus::Pending);
        }
    }

    #[tokio::test]
    async fn concurrent_creates_never_collide_or_skip() {
        let f = fixture().await;
        let mut handles = Vec::new();
        for _ in 0..10 {
            let service = f.service.clone();
            let req = request(f.active_service_id);
            handles.push(tokio::spawn(async move { service.create(req, None).await }));
        }

        let mut numbers: Vec<String> = Vec::new();
        for handle in handles {
            numbers.push(handle.await.unwrap().unwrap().tracking_number);
        }
        numbers.sort();

        let expected: Vec<String> = (1..=10).map(|n| format!("PSN-{:03}", n)).collect();
        assert_eq!(numbers, expected);
    }

    #[tokio::test]
    async fn unparseable_highest_number_restarts_at_one() {
        let f = fixture().await;
        f.bookings
            .insert(NewBooking {
                tracking_number: Some("ZZZ-LEGACY".to_string()),
                phone_number: "+250780000009".to_string(),
                email: None,
                full_name: None,
                notes: None,
                status: BookingStatus::Pending,
                service_id: f.active_service_id,
                user_id: None,
            })
            .await
            .unwrap();

        let booking = f
            .service
            .create(request(f.active_service_id), None)
            .await
            .unwrap();
        assert_eq!(booking.tracking_number, "PSN-001");
    }

    #[tokio::test]
    async fn unknown_service_is_rejected() {
        let f = fixture().await;
        assert!(matches!(
            f.service.create(request(9999), None).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn inactive_service_is_rejected() {
        let f = fixture().await;
        assert!(matches!(
            f.service.create(request(f.inactive_service_id), None).await,
            Err(DomainError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn owner_is_attached_at_creation_only_when_given() {
        let f = fixture().await;
        let anonymous = f
            .service
            .create(request(f.active_service_id), None)
            .await
            .unwrap();
        assert_eq!(anonymous.user_id, None);

        let owned = f
            .service
            .create(request(f.active_service_id), Some(42))
            .await
            .unwrap();
        assert_eq!(owned.user_id, Some(42));
    }

    #[tokio::test]
    async fn invalid_document_ids_are_skipped_and_valid_ones_linked() {
        let f = fixture().await;
        let document = f
            .documents
            .insert(crate::domain::NewDocument {
                file_name: "scan.pdf".to_string(),
                file_path: "abc.pdf".to_string(),
                file_type: None,
                file_size: 10,
            })
            .await
            .unwrap();

        let mut req = request(f.active_service_id);
        req.document_ids = vec![
            "not-a-number".to_string(),
            "777".to_string(),
            document.id.to_string(),
        ];
        let booking = f.service.create(req, None).await.unwrap();

        let linked = f.service.documents_for(booking.id).await.unwrap();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].id, document.id);
    }

    #[tokio::test]
    async fn unknown_referenced_document_does_not_abort_creation() {
        let f = fixture().await;
        let mut req = request(f.active_service_id);
        req.document_ids = vec!["777".to_string()];

        let booking = f.service.create(req, None).await.unwrap();
        assert_eq!(booking.tracking_number, "PSN-001");
        assert!(f.service.documents_for(booking.id).await.unwrap().is_empty());

        // The row the caller got back is the only one persisted; nothing
        // half-committed is left for a retry to duplicate.
        let all = f
            .service
            .list_all(&PaginationParams { page: 1, limit: 10 })
            .await
            .unwrap();
        assert_eq!(all.total, 1);
        assert_eq!(all.items[0].id, booking.id);
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_the_operation() {
        let f = fixture_with_notifier(Arc::new(FailingNotifier)).await;
        let booking = f
            .service
            .create(request(f.active_service_id), None)
            .await
            .unwrap();
        assert_eq!(booking.tracking_number, "PSN-001");

        let updated = f
            .service
            .update_status(booking.id, "approved", None)
            .await
            .unwrap();
        assert_eq!(updated.status, BookingStatus::Approved);
    }

    #[tokio::test]
    async fn status_update_is_case_insensitive_and_unrestricted() {
        let f = fixture().await;
        let booking = f
            .service
            .create(request(f.active_service_id), None)
            .await
            .unwrap();

        let updated = f
            .service
            .update_status(booking.id, "completed", None)
            .await
            .unwrap();
        assert_eq!(updated.status, BookingStatus::Completed);

        // No transition table: completed may go straight back to pending.
        let reverted = f
            .service
            .update_status(booking.id, "Pending", None)
            .await
            .unwrap();
        assert_eq!(reverted.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn unknown_status_token_is_rejected() {
        let f = fixture().await;
        let booking = f
            .service
            .create(request(f.active_service_id), None)
            .await
            .unwrap();
        assert!(matches!(
            f.service.update_status(booking.id, "bogus", None).await,
            Err(DomainError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn notes_replace_only_when_provided() {
        let f = fixture().await;
        let mut req = request(f.active_service_id);
        req.notes = Some("original notes".to_string());
        let booking = f.service.create(req, None).await.unwrap();

        let kept = f
            .service
            .update_status(booking.id, "approved", None)
            .await
            .unwrap();
        assert_eq!(kept.notes.as_deref(), Some("original notes"));

        let replaced = f
            .service
            .update_status(booking.id, "approved", Some("updated".to_string()))
            .await
            .unwrap();
        assert_eq!(replaced.notes.as_deref(), Some("updated"));
    }

    #[tokio::test]
    async fn delete_removes_booking_and_attached_documents() {
        let f = fixture().await;
        let document = f
            .documents
            .insert(crate::domain::NewDocument {
                file_name: "contract.pdf".to_string(),
                file_path: "def.pdf".to_string(),
                file_type: None,
                file_size: 20,
            })
            .await
            .unwrap();

        let mut req = request(f.active_service_id);
        req.document_ids = vec![document.id.to_string()];
        let booking = f.service.create(req, None).await.unwrap();

        f.service.delete(booking.id).await.unwrap();
        assert!(matches!(
            f.service.get(booking.id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(f.documents.find_by_id(document.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn track_finds_by_tracking_number() {
        let f = fixture().await;
        let booking = f
            .service
            .create(request(f.active_service_id), None)
            .await
            .unwrap();

        let found = f.service.track(&booking.tracking_number).await.unwrap();
        assert_eq!(found.id, booking.id);
        assert!(matches!(
            f.service.track("PSN-999").await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
