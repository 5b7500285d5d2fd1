//! Booking & booking-document repository interfaces

use async_trait::async_trait;

use super::model::{Booking, BookingDocument, BookingStatus, NewBooking, NewDocument};
use crate::domain::DomainResult;
use crate::shared::pagination::{PaginatedResult, PaginationParams};

/// Persistence seam for bookings. All listings order by creation time,
/// newest first.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: NewBooking) -> DomainResult<Booking>;
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Booking>>;
    async fn find_by_tracking_number(&self, tracking_number: &str)
        -> DomainResult<Option<Booking>>;
    /// Highest previously issued tracking number, if any. Input to the
    /// sequencer; must only be read under the sequencer lock.
    async fn highest_tracking_number(&self) -> DomainResult<Option<String>>;
    async fn list_by_user(
        &self,
        user_id: i64,
        page: &PaginationParams,
    ) -> DomainResult<PaginatedResult<Booking>>;
    async fn list_by_phone_number(
        &self,
        phone_number: &str,
        page: &PaginationParams,
    ) -> DomainResult<PaginatedResult<Booking>>;
    async fn list_by_status(
        &self,
        status: BookingStatus,
        page: &PaginationParams,
    ) -> DomainResult<PaginatedResult<Booking>>;
    async fn list_all(&self, page: &PaginationParams) -> DomainResult<PaginatedResult<Booking>>;
    async fn update_status(
        &self,
        id: i64,
        status: BookingStatus,
        notes: Option<String>,
    ) -> DomainResult<Booking>;
    /// Hard delete of the booking row.
    async fn delete(&self, id: i64) -> DomainResult<()>;
}

#[async_trait]
pub trait BookingDocumentRepository: Send + Sync {
    async fn insert(&self, document: NewDocument) -> DomainResult<BookingDocument>;
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<BookingDocument>>;
    async fn attach_to_booking(&self, document_id: i64, booking_id: i64) -> DomainResult<()>;
    async fn list_for_booking(&self, booking_id: i64) -> DomainResult<Vec<BookingDocument>>;
    /// Remove every document row linked to a booking, returning how many
    /// were removed. Unattached rows are untouched.
    async fn delete_for_booking(&self, booking_id: i64) -> DomainResult<u64>;
}
