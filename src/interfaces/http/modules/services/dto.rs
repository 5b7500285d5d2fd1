//! Service catalog DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{NewServiceOffering, ServiceOffering};

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceDto {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub active: bool,
    pub turnaround_time: Option<String>,
    pub price_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ServiceOffering> for ServiceDto {
    fn from(service: ServiceOffering) -> Self {
        Self {
            id: service.id,
            title: service.title,
            description: service.description,
            active: service.active,
            turnaround_time: service.turnaround_time,
            price_info: service.price_info,
            created_at: service.created_at,
            updated_at: service.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaveServiceRequest {
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[validate(length(max = 100, message = "turnaround time is too long"))]
    pub turnaround_time: Option<String>,
    #[validate(length(max = 255, message = "price info is too long"))]
    pub price_info: Option<String>,
}

fn default_active() -> bool {
    true
}

impl From<SaveServiceRequest> for NewServiceOffering {
    fn from(request: SaveServiceRequest) -> Self {
        NewServiceOffering {
            title: request.title,
            description: request.description,
            active: request.active,
            turnaround_time: request.turnaround_time,
            price_info: request.price_info,
        }
    }
}
