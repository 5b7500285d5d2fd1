//! Outbound notifications for booking events
//!
//! Notification delivery is best-effort: the booking service fires these
//! after the state change is committed and swallows any failure, so a broken
//! channel can never fail a booking operation.

use async_trait::async_trait;
use tracing::info;

use crate::domain::{Booking, DomainResult};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn booking_created(&self, booking: &Booking) -> DomainResult<()>;
    async fn booking_status_changed(&self, booking: &Booking) -> DomainResult<()>;
}

/// Default notifier: writes booking events to the log. Stands in for the
/// mail/SMS channel in deployments that have none configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn booking_created(&self, booking: &Booking) -> DomainResult<()> {
        info!(
            tracking_number = %booking.tracking_number,
            phone_number = %booking.phone_number,
            "booking created"
        );
        Ok(())
    }

    async fn booking_status_changed(&self, booking: &Booking) -> DomainResult<()> {
        info!(
            tracking_number = %booking.tracking_number,
            status = %booking.status,
            "booking status changed"
        );
        Ok(())
    }
}
