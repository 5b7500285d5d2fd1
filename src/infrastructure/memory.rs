//! In-memory repository implementations for development and testing

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::domain::{
    Booking, BookingDocument, BookingDocumentRepository, BookingRepository, BookingStatus,
    DomainError, DomainResult, NewBooking, NewDocument, NewServiceOffering, NewUser,
    ServiceOffering, ServiceRepository, User, UserRepository,
};
use crate::shared::pagination::{PaginatedResult, PaginationParams};

fn paginate<T>(mut items: Vec<T>, page: &PaginationParams) -> PaginatedResult<T> {
    let total = items.len() as u64;
    let start = ((page.page.max(1) - 1) * page.limit) as usize;
    let items = if start >= items.len() {
        Vec::new()
    } else {
        items.drain(start..).take(page.limit as usize).collect()
    };
    PaginatedResult::new(items, total, page.page, page.limit)
}

/// In-memory user repository
pub struct InMemoryUserRepository {
    users: DashMap<i64, User>,
    counter: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            counter: AtomicI64::new(1),
        }
    }

    /// Insert a user bypassing the uniqueness checks, with an explicit
    /// enabled flag. Test fixtures only.
    pub async fn seed(&self, user: NewUser, enabled: bool) -> User {
        let now = Utc::now();
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        let user = User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            full_name: user.full_name,
            phone_number: user.phone_number,
            enabled,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(id, user.clone());
        user
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }

    async fn insert(&self, user: NewUser) -> DomainResult<User> {
        if self.users.iter().any(|u| u.username == user.username) {
            return Err(DomainError::Conflict(format!(
                "Username {} is already taken",
                user.username
            )));
        }
        if self.users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::Conflict(format!(
                "Email {} is already registered",
                user.email
            )));
        }
        Ok(self.seed(user, true).await)
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.users.len() as u64)
    }
}

/// In-memory booking repository
pub struct InMemoryBookingRepository {
    bookings: DashMap<i64, Booking>,
    counter: AtomicI64,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self {
            bookings: DashMap::new(),
            counter: AtomicI64::new(1),
        }
    }

    fn sorted(&self, mut filter: impl FnMut(&Booking) -> bool) -> Vec<Booking> {
        let mut items: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| filter(b))
            .map(|b| b.clone())
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        items
    }
}

impl Default for InMemoryBookingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert(&self, booking: NewBooking) -> DomainResult<Booking> {
        let tracking_number = booking.tracking_number.ok_or_else(|| {
            DomainError::InvalidState("Tracking number must be assigned before insert".to_string())
        })?;
        if self
            .bookings
            .iter()
            .any(|b| b.tracking_number == tracking_number)
        {
            return Err(DomainError::Conflict(format!(
                "Tracking number {} already exists",
                tracking_number
            )));
        }

        let now = Utc::now();
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        let booking = Booking {
            id,
            tracking_number,
            phone_number: booking.phone_number,
            email: booking.email,
            full_name: booking.full_name,
            notes: booking.notes,
            status: booking.status,
            service_id: booking.service_id,
            user_id: booking.user_id,
            created_at: now,
            updated_at: now,
        };
        self.bookings.insert(id, booking.clone());
        Ok(booking)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Booking>> {
        Ok(self.bookings.get(&id).map(|b| b.clone()))
    }

    async fn find_by_tracking_number(
        &self,
        tracking_number: &str,
    ) -> DomainResult<Option<Booking>> {
        Ok(self
            .bookings
            .iter()
            .find(|b| b.tracking_number == tracking_number)
            .map(|b| b.clone()))
    }

    async fn highest_tracking_number(&self) -> DomainResult<Option<String>> {
        Ok(self
            .bookings
            .iter()
            .map(|b| b.tracking_number.clone())
            .max())
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        page: &PaginationParams,
    ) -> DomainResult<PaginatedResult<Booking>> {
        Ok(paginate(self.sorted(|b| b.user_id == Some(user_id)), page))
    }

    async fn list_by_phone_number(
        &self,
        phone_number: &str,
        page: &PaginationParams,
    ) -> DomainResult<PaginatedResult<Booking>> {
        Ok(paginate(self.sorted(|b| b.phone_number == phone_number), page))
    }

    async fn list_by_status(
        &self,
        status: BookingStatus,
        page: &PaginationParams,
    ) -> DomainResult<PaginatedResult<Booking>> {
        Ok(paginate(self.sorted(|b| b.status == status), page))
    }

    async fn list_all(&self, page: &PaginationParams) -> DomainResult<PaginatedResult<Booking>> {
        Ok(paginate(self.sorted(|_| true), page))
    }

    async fn update_status(
        &self,
        id: i64,
        status: BookingStatus,
        notes: Option<String>,
    ) -> DomainResult<Booking> {
        let mut booking = self
            .bookings
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Booking", "id", id))?;
        booking.status = status;
        if let Some(notes) = notes {
            booking.notes = Some(notes);
        }
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        self.bookings
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("Booking", "id", id))?;
        Ok(())
    }
}

/// In-memory booking document repository
pub struct InMemoryBookingDocumentRepository {
    documents: DashMap<i64, BookingDocument>,
    counter: AtomicI64,
}

impl InMemoryBookingDocumentRepository {
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
            counter: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryBookingDocumentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingDocumentRepository for InMemoryBookingDocumentRepository {
    async fn insert(&self, document: NewDocument) -> DomainResult<BookingDocument> {
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        let document = BookingDocument {
            id,
            file_name: document.file_name,
            file_path: document.file_path,
            file_type: document.file_type,
            file_size: document.file_size,
            booking_id: None,
            created_at: Utc::now(),
        };
        self.documents.insert(id, document.clone());
        Ok(document)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<BookingDocument>> {
        Ok(self.documents.get(&id).map(|d| d.clone()))
    }

    async fn attach_to_booking(&self, document_id: i64, booking_id: i64) -> DomainResult<()> {
        let mut document = self
            .documents
            .get_mut(&document_id)
            .ok_or_else(|| DomainError::not_found("Document", "id", document_id))?;
        document.booking_id = Some(booking_id);
        Ok(())
    }

    async fn list_for_booking(&self, booking_id: i64) -> DomainResult<Vec<BookingDocument>> {
        let mut items: Vec<BookingDocument> = self
            .documents
            .iter()
            .filter(|d| d.booking_id == Some(booking_id))
            .map(|d| d.clone())
            .collect();
        items.sort_by_key(|d| d.id);
        Ok(items)
    }

    async fn delete_for_booking(&self, booking_id: i64) -> DomainResult<u64> {
        let before = self.documents.len();
        self.documents
            .retain(|_, d| d.booking_id != Some(booking_id));
        Ok((before - self.documents.len()) as u64)
    }
}

/// In-memory service catalog repository
pub struct InMemoryServiceRepository {
    services: DashMap<i64, ServiceOffering>,
    counter: AtomicI64,
}

impl InMemoryServiceRepository {
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
            counter: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryServiceRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceRepository for InMemoryServiceRepository {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<ServiceOffering>> {
        Ok(self.services.get(&id).map(|s| s.clone()))
    }

    async fn list(&self, active_only: bool) -> DomainResult<Vec<ServiceOffering>> {
        let mut items: Vec<ServiceOffering> = self
            .services
            .iter()
            .filter(|s| !active_only || s.active)
            .map(|s| s.clone())
            .collect();
        items.sort_by_key(|s| s.id);
        Ok(items)
    }

    async fn insert(&self, service: NewServiceOffering) -> DomainResult<ServiceOffering> {
        let now = Utc::now();
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        let service = ServiceOffering {
            id,
            title: service.title,
            description: service.description,
            active: service.active,
            turnaround_time: service.turnaround_time,
            price_info: service.price_info,
            created_at: now,
            updated_at: now,
        };
        self.services.insert(id, service.clone());
        Ok(service)
    }

    async fn update(&self, service: ServiceOffering) -> DomainResult<ServiceOffering> {
        let mut entry = self
            .services
            .get_mut(&service.id)
            .ok_or_else(|| DomainError::not_found("Service", "id", service.id))?;
        let mut updated = service;
        updated.updated_at = Utc::now();
        *entry = updated.clone();
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_booking(tracking: &str, phone: &str) -> NewBooking {
        NewBooking {
            tracking_number: Some(tracking.to_string()),
            phone_number: phone.to_string(),
            email: None,
            full_name: None,
            notes: None,
            status: BookingStatus::Pending,
            service_id: 1,
            user_id: None,
        }
    }

    #[tokio::test]
    async fn duplicate_tracking_number_is_rejected() {
        let repo = InMemoryBookingRepository::new();
        repo.insert(new_booking("PSN-001", "+1")).await.unwrap();
        assert!(matches!(
            repo.insert(new_booking("PSN-001", "+2")).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn highest_tracking_number_reflects_inserts() {
        let repo = InMemoryBookingRepository::new();
        assert_eq!(repo.highest_tracking_number().await.unwrap(), None);

        repo.insert(new_booking("PSN-001", "+1")).await.unwrap();
        repo.insert(new_booking("PSN-003", "+2")).await.unwrap();
        repo.insert(new_booking("PSN-002", "+3")).await.unwrap();
        assert_eq!(
            repo.highest_tracking_number().await.unwrap(),
            Some("PSN-003".to_string())
        );
    }

    #[tokio::test]
    async fn pagination_slices_and_counts() {
        let repo = InMemoryBookingRepository::new();
        for i in 1..=5 {
            repo.insert(new_booking(&format!("PSN-{:03}", i), "+250"))
                .await
                .unwrap();
        }

        let page = repo
            .list_all(&PaginationParams { page: 2, limit: 2 })
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 2);
    }

    #[tokio::test]
    async fn attach_links_document_once() {
        let repo = InMemoryBookingDocumentRepository::new();
        let doc = repo
            .insert(NewDocument {
                file_name: "passport.pdf".to_string(),
                file_path: "abc.pdf".to_string(),
                file_type: Some("application/pdf".to_string()),
                file_size: 1024,
            })
            .await
            .unwrap();
        assert_eq!(doc.booking_id, None);

        repo.attach_to_booking(doc.id, 7).await.unwrap();
        let stored = repo.find_by_id(doc.id).await.unwrap().unwrap();
        assert_eq!(stored.booking_id, Some(7));
        assert_eq!(repo.list_for_booking(7).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_for_booking_removes_only_linked_rows() {
        let repo = InMemoryBookingDocumentRepository::new();
        let make = |name: &str| NewDocument {
            file_name: name.to_string(),
            file_path: format!("{}.bin", name),
            file_type: None,
            file_size: 1,
        };
        let linked = repo.insert(make("id-card")).await.unwrap();
        let unattached = repo.insert(make("draft")).await.unwrap();
        repo.attach_to_booking(linked.id, 7).await.unwrap();

        assert_eq!(repo.delete_for_booking(7).await.unwrap(), 1);
        assert!(repo.find_by_id(linked.id).await.unwrap().is_none());
        assert!(repo.find_by_id(unattached.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn user_uniqueness_is_enforced() {
        let repo = InMemoryUserRepository::new();
        let user = NewUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
            full_name: None,
            phone_number: None,
            role: crate::domain::UserRole::User,
        };
        repo.insert(user.clone()).await.unwrap();
        assert!(matches!(
            repo.insert(user).await,
            Err(DomainError::Conflict(_))
        ));
    }
}
