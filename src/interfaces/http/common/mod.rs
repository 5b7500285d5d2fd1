//! Shared HTTP response wrappers and extractors

pub mod validated_json;

pub use validated_json::ValidatedJson;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::pagination::{PaginatedResult, PaginationParams};

/// Standard success envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Paginated listing envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn from_result<U>(result: PaginatedResult<U>, f: impl FnMut(U) -> T) -> Self {
        let result = result.map(f);
        Self {
            items: result.items,
            total: result.total,
            page: result.page,
            limit: result.limit,
            total_pages: result.total_pages,
        }
    }
}

/// Pagination query string (`?page=1&limit=20`)
#[derive(Debug, Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size, capped at 100
    pub limit: Option<u32>,
}

impl PaginationQuery {
    pub fn params(&self) -> PaginationParams {
        PaginationParams {
            page: self.page.unwrap_or(1).max(1),
            limit: self.limit.unwrap_or(20).clamp(1, 100),
        }
    }
}
