//! Booking DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::BookingRequest;
use crate::domain::{Booking, BookingDocument};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    pub service_id: i64,
    #[validate(length(min = 1, max = 30, message = "phone number is required"))]
    pub phone_number: String,
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 255, message = "full name is too long"))]
    pub full_name: Option<String>,
    pub notes: Option<String>,
    /// Ids of pre-uploaded documents to link to the booking
    #[serde(default)]
    pub document_ids: Vec<String>,
}

impl From<CreateBookingRequest> for BookingRequest {
    fn from(request: CreateBookingRequest) -> Self {
        BookingRequest {
            service_id: request.service_id,
            phone_number: request.phone_number,
            email: request.email,
            full_name: request.full_name,
            notes: request.notes,
            document_ids: request.document_ids,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TrackBookingRequest {
    #[validate(length(min = 1, max = 30, message = "tracking number is required"))]
    pub tracking_number: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    /// New status, case-insensitive (e.g. "approved")
    #[validate(length(min = 1, max = 20, message = "status is required"))]
    pub status: String,
    /// Replacement notes; omitted notes keep the stored ones
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: i64,
    pub tracking_number: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub service_id: i64,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingDto {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            tracking_number: booking.tracking_number,
            phone_number: booking.phone_number,
            email: booking.email,
            full_name: booking.full_name,
            notes: booking.notes,
            status: booking.status.to_string(),
            service_id: booking.service_id,
            user_id: booking.user_id,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

/// Document metadata; the storage locator stays server-side.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDocumentDto {
    pub id: i64,
    pub file_name: String,
    pub file_type: Option<String>,
    pub file_size: i64,
    pub booking_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<BookingDocument> for BookingDocumentDto {
    fn from(document: BookingDocument) -> Self {
        Self {
            id: document.id,
            file_name: document.file_name,
            file_type: document.file_type,
            file_size: document.file_size,
            booking_id: document.booking_id,
            created_at: document.created_at,
        }
    }
}
