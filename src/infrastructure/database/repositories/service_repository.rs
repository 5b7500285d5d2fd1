use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::{
    DomainError, DomainResult, NewServiceOffering, ServiceOffering, ServiceRepository,
};
use crate::infrastructure::database::entities::service;

pub struct SeaOrmServiceRepository {
    db: DatabaseConnection,
}

impl SeaOrmServiceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(model: service::Model) -> ServiceOffering {
    ServiceOffering {
        id: model.id,
        title: model.title,
        description: model.description,
        active: model.active,
        turnaround_time: model.turnaround_time,
        price_info: model.price_info,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

#[async_trait]
impl ServiceRepository for SeaOrmServiceRepository {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<ServiceOffering>> {
        let model = service::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn list(&self, active_only: bool) -> DomainResult<Vec<ServiceOffering>> {
        let mut query = service::Entity::find().order_by_asc(service::Column::Id);
        if active_only {
            query = query.filter(service::Column::Active.eq(true));
        }
        let models = query.all(&self.db).await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn insert(&self, new_service: NewServiceOffering) -> DomainResult<ServiceOffering> {
        let now = Utc::now();
        let active = service::ActiveModel {
            title: Set(new_service.title),
            description: Set(new_service.description),
            active: Set(new_service.active),
            turnaround_time: Set(new_service.turnaround_time),
            price_info: Set(new_service.price_info),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let model = active.insert(&self.db).await?;
        Ok(model_to_domain(model))
    }

    async fn update(&self, updated: ServiceOffering) -> DomainResult<ServiceOffering> {
        let existing = service::Entity::find_by_id(updated.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Service", "id", updated.id))?;

        let mut active: service::ActiveModel = existing.into();
        active.title = Set(updated.title);
        active.description = Set(updated.description);
        active.active = Set(updated.active);
        active.turnaround_time = Set(updated.turnaround_time);
        active.price_info = Set(updated.price_info);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(model_to_domain(model))
    }
}
