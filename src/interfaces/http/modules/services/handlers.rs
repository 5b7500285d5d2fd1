//! Service catalog API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::dto::{SaveServiceRequest, ServiceDto};
use crate::application::CatalogService;
use crate::domain::DomainResult;
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};

/// Service catalog handler state
#[derive(Clone)]
pub struct ServiceHandlerState {
    pub catalog: Arc<CatalogService>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListServicesQuery {
    /// Include inactive services in the listing
    #[serde(default)]
    pub include_inactive: bool,
}

#[utoipa::path(
    get,
    path = "/api/v1/services",
    tag = "Services",
    params(ListServicesQuery),
    responses(
        (status = 200, description = "Service catalog", body = ApiResponse<Vec<ServiceDto>>)
    )
)]
pub async fn list_services(
    State(state): State<ServiceHandlerState>,
    Query(query): Query<ListServicesQuery>,
) -> DomainResult<Json<ApiResponse<Vec<ServiceDto>>>> {
    let services = state.catalog.list(query.include_inactive).await?;
    let dtos = services.into_iter().map(ServiceDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/v1/services/{id}",
    tag = "Services",
    params(("id" = i64, Path, description = "Service id")),
    responses(
        (status = 200, description = "Service details", body = ApiResponse<ServiceDto>),
        (status = 404, description = "Service not found")
    )
)]
pub async fn get_service(
    State(state): State<ServiceHandlerState>,
    Path(id): Path<i64>,
) -> DomainResult<Json<ApiResponse<ServiceDto>>> {
    let service = state.catalog.get(id).await?;
    Ok(Json(ApiResponse::success(service.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/services",
    tag = "Services",
    security(("bearer_auth" = [])),
    request_body = SaveServiceRequest,
    responses(
        (status = 201, description = "Service created", body = ApiResponse<ServiceDto>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Administrator role required")
    )
)]
pub async fn create_service(
    State(state): State<ServiceHandlerState>,
    ValidatedJson(request): ValidatedJson<SaveServiceRequest>,
) -> DomainResult<(StatusCode, Json<ApiResponse<ServiceDto>>)> {
    let service = state.catalog.create(request.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(service.into())),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/services/{id}",
    tag = "Services",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Service id")),
    request_body = SaveServiceRequest,
    responses(
        (status = 200, description = "Service updated", body = ApiResponse<ServiceDto>),
        (status = 404, description = "Service not found")
    )
)]
pub async fn update_service(
    State(state): State<ServiceHandlerState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<SaveServiceRequest>,
) -> DomainResult<Json<ApiResponse<ServiceDto>>> {
    let service = state.catalog.update(id, request.into()).await?;
    Ok(Json(ApiResponse::success(service.into())))
}
