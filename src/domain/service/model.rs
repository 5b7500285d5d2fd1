//! Service catalog domain entity

use chrono::{DateTime, Utc};

/// A bookable professional service (notarization, consultancy, ...).
///
/// Bookings reference a service by id; an inactive service cannot receive
/// new bookings.
#[derive(Debug, Clone)]
pub struct ServiceOffering {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub active: bool,
    pub turnaround_time: Option<String>,
    pub price_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field set for a service about to be created.
#[derive(Debug, Clone)]
pub struct NewServiceOffering {
    pub title: String,
    pub description: Option<String>,
    pub active: bool,
    pub turnaround_time: Option<String>,
    pub price_info: Option<String>,
}
