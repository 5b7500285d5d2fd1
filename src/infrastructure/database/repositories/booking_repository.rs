use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::{
    Booking, BookingRepository, BookingStatus, DomainError, DomainResult, NewBooking,
};
use crate::infrastructure::database::entities::booking;
use crate::shared::pagination::{PaginatedResult, PaginationParams};

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn paged(
        &self,
        query: sea_orm::Select<booking::Entity>,
        page: &PaginationParams,
    ) -> DomainResult<PaginatedResult<Booking>> {
        let query = query
            .order_by_desc(booking::Column::CreatedAt)
            .order_by_desc(booking::Column::Id);

        let total = query.clone().count(&self.db).await?;

        let page_number = page.page.max(1);
        let offset = ((page_number - 1) * page.limit) as u64;
        let models = query
            .offset(offset)
            .limit(page.limit as u64)
            .all(&self.db)
            .await?;

        let items = models.into_iter().map(model_to_domain).collect();
        Ok(PaginatedResult::new(items, total, page_number, page.limit))
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_status_to_domain(status: booking::BookingStatus) -> BookingStatus {
    match status {
        booking::BookingStatus::Pending => BookingStatus::Pending,
        booking::BookingStatus::Approved => BookingStatus::Approved,
        booking::BookingStatus::InProgress => BookingStatus::InProgress,
        booking::BookingStatus::Completed => BookingStatus::Completed,
        booking::BookingStatus::Rejected => BookingStatus::Rejected,
        booking::BookingStatus::Cancelled => BookingStatus::Cancelled,
    }
}

fn domain_status_to_entity(status: BookingStatus) -> booking::BookingStatus {
    match status {
        BookingStatus::Pending => booking::BookingStatus::Pending,
        BookingStatus::Approved => booking::BookingStatus::Approved,
        BookingStatus::InProgress => booking::BookingStatus::InProgress,
        BookingStatus::Completed => booking::BookingStatus::Completed,
        BookingStatus::Rejected => booking::BookingStatus::Rejected,
        BookingStatus::Cancelled => booking::BookingStatus::Cancelled,
    }
}

fn model_to_domain(model: booking::Model) -> Booking {
    Booking {
        id: model.id,
        tracking_number: model.tracking_number,
        phone_number: model.phone_number,
        email: model.email,
        full_name: model.full_name,
        notes: model.notes,
        status: entity_status_to_domain(model.status),
        service_id: model.service_id,
        user_id: model.user_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn unique_violation(e: sea_orm::DbErr) -> DomainError {
    if e.to_string().contains("UNIQUE") || e.to_string().contains("duplicate") {
        DomainError::Conflict("Tracking number already exists".to_string())
    } else {
        e.into()
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn insert(&self, new_booking: NewBooking) -> DomainResult<Booking> {
        let tracking_number = new_booking.tracking_number.ok_or_else(|| {
            DomainError::InvalidState("Tracking number must be assigned before insert".to_string())
        })?;

        let now = Utc::now();
        let active = booking::ActiveModel {
            tracking_number: Set(tracking_number),
            phone_number: Set(new_booking.phone_number),
            email: Set(new_booking.email),
            full_name: Set(new_booking.full_name),
            notes: Set(new_booking.notes),
            status: Set(domain_status_to_entity(new_booking.status)),
            service_id: Set(new_booking.service_id),
            user_id: Set(new_booking.user_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active.insert(&self.db).await.map_err(unique_violation)?;
        Ok(model_to_domain(model))
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_tracking_number(
        &self,
        tracking_number: &str,
    ) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find()
            .filter(booking::Column::TrackingNumber.eq(tracking_number))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn highest_tracking_number(&self) -> DomainResult<Option<String>> {
        let model = booking::Entity::find()
            .order_by_desc(booking::Column::TrackingNumber)
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.tracking_number))
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        page: &PaginationParams,
    ) -> DomainResult<PaginatedResult<Booking>> {
        let query = booking::Entity::find().filter(booking::Column::UserId.eq(user_id));
        self.paged(query, page).await
    }

    async fn list_by_phone_number(
        &self,
        phone_number: &str,
        page: &PaginationParams,
    ) -> DomainResult<PaginatedResult<Booking>> {
        let query = booking::Entity::find().filter(booking::Column::PhoneNumber.eq(phone_number));
        self.paged(query, page).await
    }

    async fn list_by_status(
        &self,
        status: BookingStatus,
        page: &PaginationParams,
    ) -> DomainResult<PaginatedResult<Booking>> {
        let query = booking::Entity::find()
            .filter(booking::Column::Status.eq(domain_status_to_entity(status)));
        self.paged(query, page).await
    }

    async fn list_all(&self, page: &PaginationParams) -> DomainResult<PaginatedResult<Booking>> {
        self.paged(booking::Entity::find(), page).await
    }

    async fn update_status(
        &self,
        id: i64,
        status: BookingStatus,
        notes: Option<String>,
    ) -> DomainResult<Booking> {
        let existing = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", "id", id))?;

        let mut active: booking::ActiveModel = existing.into();
        active.status = Set(domain_status_to_entity(status));
        if let Some(notes) = notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(model_to_domain(model))
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = booking::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Booking", "id", id));
        }
        Ok(())
    }
}
