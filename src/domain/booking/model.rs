//! Booking domain entities

use chrono::{DateTime, Utc};
use std::str::FromStr;

/// Prefix of every public tracking number
pub const TRACKING_NUMBER_PREFIX: &str = "PSN-";

/// Processing state of a booking.
///
/// Parsed case-insensitively from client input; rendered canonical uppercase.
/// Any state may move to any other state — there is no transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Approved,
    InProgress,
    Completed,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            "REJECTED" => Ok(Self::Rejected),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(format!("Invalid status: {}", other)),
        }
    }
}

/// A booking for a professional service.
///
/// `user_id` is absent for anonymous bookings and is set at most once, at
/// creation. `tracking_number` is assigned exactly once by the sequencer.
#[derive(Debug, Clone)]
pub struct Booking {
    pub id: i64,
    pub tracking_number: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub service_id: i64,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field set for a booking about to be created.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub tracking_number: Option<String>,
    pub phone_number: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub service_id: i64,
    pub user_id: Option<i64>,
}

/// A document uploaded for a booking.
///
/// Created independently of any booking (pre-upload); `booking_id` stays
/// empty until the document is attached, and a document belongs to at most
/// one booking.
#[derive(Debug, Clone)]
pub struct BookingDocument {
    pub id: i64,
    /// Name the client declared at upload time
    pub file_name: String,
    /// Generated storage locator, decoupled from the original name
    pub file_path: String,
    pub file_type: Option<String>,
    pub file_size: i64,
    pub booking_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Metadata for a freshly stored file, before it has a database row.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub file_name: String,
    pub file_path: String,
    pub file_type: Option<String>,
    pub file_size: i64,
}
