use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::{
    BookingDocument, BookingDocumentRepository, DomainError, DomainResult, NewDocument,
};
use crate::infrastructure::database::entities::booking_document;

pub struct SeaOrmBookingDocumentRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingDocumentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(model: booking_document::Model) -> BookingDocument {
    BookingDocument {
        id: model.id,
        file_name: model.file_name,
        file_path: model.file_path,
        file_type: model.file_type,
        file_size: model.file_size,
        booking_id: model.booking_id,
        created_at: model.created_at,
    }
}

#[async_trait]
impl BookingDocumentRepository for SeaOrmBookingDocumentRepository {
    async fn insert(&self, document: NewDocument) -> DomainResult<BookingDocument> {
        let active = booking_document::ActiveModel {
            file_name: Set(document.file_name),
            file_path: Set(document.file_path),
            file_type: Set(document.file_type),
            file_size: Set(document.file_size),
            booking_id: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let model = active.insert(&self.db).await?;
        Ok(model_to_domain(model))
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<BookingDocument>> {
        let model = booking_document::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn attach_to_booking(&self, document_id: i64, booking_id: i64) -> DomainResult<()> {
        let existing = booking_document::Entity::find_by_id(document_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Document", "id", document_id))?;

        let mut active: booking_document::ActiveModel = existing.into();
        active.booking_id = Set(Some(booking_id));
        active.update(&self.db).await?;
        Ok(())
    }

    async fn list_for_booking(&self, booking_id: i64) -> DomainResult<Vec<BookingDocument>> {
        let models = booking_document::Entity::find()
            .filter(booking_document::Column::BookingId.eq(booking_id))
            .order_by_asc(booking_document::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn delete_for_booking(&self, booking_id: i64) -> DomainResult<u64> {
        let result = booking_document::Entity::delete_many()
            .filter(booking_document::Column::BookingId.eq(booking_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
