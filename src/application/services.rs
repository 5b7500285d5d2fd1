//! Service catalog use cases

use std::sync::Arc;

use crate::domain::{
    DomainError, DomainResult, NewServiceOffering, ServiceOffering, ServiceRepository,
};

pub struct CatalogService {
    services: Arc<dyn ServiceRepository>,
}

impl CatalogService {
    pub fn new(services: Arc<dyn ServiceRepository>) -> Self {
        Self { services }
    }

    /// Public listings hide inactive services; administrators see all.
    pub async fn list(&self, include_inactive: bool) -> DomainResult<Vec<ServiceOffering>> {
        self.services.list(!include_inactive).await
    }

    pub async fn get(&self, id: i64) -> DomainResult<ServiceOffering> {
        self.services
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Service", "id", id))
    }

    pub async fn create(&self, service: NewServiceOffering) -> DomainResult<ServiceOffering> {
        self.services.insert(service).await
    }

    /// Full replacement of the mutable fields.
    pub async fn update(
        &self,
        id: i64,
        fields: NewServiceOffering,
    ) -> DomainResult<ServiceOffering> {
        let mut service = self.get(id).await?;
        service.title = fields.title;
        service.description = fields.description;
        service.active = fields.active;
        service.turnaround_time = fields.turnaround_time;
        service.price_info = fields.price_info;
        self.services.update(service).await
    }
}
