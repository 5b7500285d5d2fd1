//! Ownership checks for booking resources
//!
//! A booking is owned by at most one account. Anonymous bookings have no
//! owner, so ownership checks against them always fail and the resource is
//! effectively reachable only by administrators or by tracking number.

use std::sync::Arc;

use crate::domain::{BookingRepository, DomainResult, UserRepository};

use super::gate::Principal;

/// Read-only authorizer answering "may this principal touch this booking".
#[derive(Clone)]
pub struct OwnershipAuthorizer {
    bookings: Arc<dyn BookingRepository>,
    users: Arc<dyn UserRepository>,
}

impl OwnershipAuthorizer {
    pub fn new(bookings: Arc<dyn BookingRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { bookings, users }
    }

    /// Whether `username` owns the booking. A missing booking, an anonymous
    /// booking, or a dangling owner reference all answer `false`; only
    /// repository failures surface as errors.
    pub async fn is_owner(&self, booking_id: i64, username: &str) -> DomainResult<bool> {
        let booking = match self.bookings.find_by_id(booking_id).await? {
            Some(b) => b,
            None => return Ok(false),
        };

        let owner_id = match booking.user_id {
            Some(id) => id,
            None => return Ok(false),
        };

        let owner = match self.users.find_by_id(owner_id).await? {
            Some(u) => u,
            None => return Ok(false),
        };

        Ok(owner.username == username)
    }

    /// Owner-or-admin rule used by the protected booking endpoints.
    pub async fn may_access(&self, booking_id: i64, principal: &Principal) -> DomainResult<bool> {
        if principal.is_admin() {
            return Ok(true);
        }
        self.is_owner(booking_id, &principal.username).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookingStatus, NewBooking, NewUser, UserRole};
    use crate::infrastructure::memory::{InMemoryBookingRepository, InMemoryUserRepository};

    async fn fixture() -> (OwnershipAuthorizer, i64, i64) {
        let users = Arc::new(InMemoryUserRepository::new());
        let bookings = Arc::new(InMemoryBookingRepository::new());

        let alice = users
            .seed(
                NewUser {
                    username: "alice".to_string(),
                    email: "alice@example.com".to_string(),
                    password_hash: "hash".to_string(),
                    full_name: None,
                    phone_number: None,
                    role: UserRole::User,
                },
                true,
            )
            .await;

        let owned = bookings
            .insert(NewBooking {
                tracking_number: Some("PSN-001".to_string()),
                phone_number: "+250780000001".to_string(),
                email: None,
                full_name: None,
                notes: None,
                status: BookingStatus::default(),
                service_id: 1,
                user_id: Some(alice.id),
            })
            .await
            .unwrap();

        let anonymous = bookings
            .insert(NewBooking {
                tracking_number: Some("PSN-002".to_string()),
                phone_number: "+250780000002".to_string(),
                email: None,
                full_name: None,
                notes: None,
                status: BookingStatus::default(),
                service_id: 1,
                user_id: None,
            })
            .await
            .unwrap();

        (
            OwnershipAuthorizer::new(bookings, users),
            owned.id,
            anonymous.id,
        )
    }

    #[tokio::test]
    async fn owner_matches_exact_username() {
        let (authorizer, owned_id, _) = fixture().await;
        assert!(authorizer.is_owner(owned_id, "alice").await.unwrap());
        assert!(!authorizer.is_owner(owned_id, "Alice").await.unwrap());
        assert!(!authorizer.is_owner(owned_id, "bob").await.unwrap());
    }

    #[tokio::test]
    async fn anonymous_booking_has_no_owner() {
        let (authorizer, _, anonymous_id) = fixture().await;
        assert!(!authorizer.is_owner(anonymous_id, "alice").await.unwrap());
    }

    #[tokio::test]
    async fn missing_booking_is_not_owned() {
        let (authorizer, _, _) = fixture().await;
        assert!(!authorizer.is_owner(9999, "alice").await.unwrap());
    }

    #[tokio::test]
    async fn admin_may_access_any_booking() {
        let (authorizer, owned_id, anonymous_id) = fixture().await;
        let admin = Principal {
            user_id: 42,
            username: "root".to_string(),
            role: UserRole::Admin,
        };
        assert!(authorizer.may_access(owned_id, &admin).await.unwrap());
        assert!(authorizer.may_access(anonymous_id, &admin).await.unwrap());
    }
}
