//! Service catalog repository interface

use async_trait::async_trait;

use super::model::{NewServiceOffering, ServiceOffering};
use crate::domain::DomainResult;

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<ServiceOffering>>;
    async fn list(&self, active_only: bool) -> DomainResult<Vec<ServiceOffering>>;
    async fn insert(&self, service: NewServiceOffering) -> DomainResult<ServiceOffering>;
    async fn update(&self, service: ServiceOffering) -> DomainResult<ServiceOffering>;
}
