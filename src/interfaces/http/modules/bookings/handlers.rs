//! Booking API handlers
//!
//! Read endpoints enforce owner-or-admin in the handler itself, based on the
//! principal the gate may or may not have installed. Admin-only write
//! endpoints are guarded by the `require_admin` route layer instead.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::dto::{
    BookingDocumentDto, BookingDto, CreateBookingRequest, TrackBookingRequest, UpdateStatusRequest,
};
use crate::application::{BookingService, DocumentService};
use crate::auth::{OwnershipAuthorizer, Principal};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::storage::UploadedFile;
use crate::interfaces::http::common::{
    ApiResponse, PaginatedResponse, PaginationQuery, ValidatedJson,
};

/// Booking handler state
#[derive(Clone)]
pub struct BookingHandlerState {
    pub bookings: Arc<BookingService>,
    pub documents: Arc<DocumentService>,
    pub ownership: OwnershipAuthorizer,
}

fn require_principal(principal: Option<Extension<Principal>>) -> DomainResult<Principal> {
    principal
        .map(|Extension(p)| p)
        .ok_or_else(|| DomainError::Unauthorized("Full authentication is required".to_string()))
}

async fn require_owner_or_admin(
    state: &BookingHandlerState,
    booking_id: i64,
    principal: Option<Extension<Principal>>,
) -> DomainResult<()> {
    let principal = require_principal(principal)?;
    if !state.ownership.may_access(booking_id, &principal).await? {
        return Err(DomainError::Forbidden(
            "Access to this booking is denied".to_string(),
        ));
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/public",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = ApiResponse<BookingDto>),
        (status = 400, description = "Validation error or inactive service"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn create_public_booking(
    State(state): State<BookingHandlerState>,
    principal: Option<Extension<Principal>>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> DomainResult<(StatusCode, Json<ApiResponse<BookingDto>>)> {
    // Best-effort association: a principal is attached as owner when one is
    // present, but the endpoint never requires it.
    let owner = principal.map(|Extension(p)| p.user_id);
    let booking = state.bookings.create(request.into(), owner).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(booking.into())),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created for the caller", body = ApiResponse<BookingDto>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_booking(
    State(state): State<BookingHandlerState>,
    principal: Option<Extension<Principal>>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> DomainResult<(StatusCode, Json<ApiResponse<BookingDto>>)> {
    let principal = require_principal(principal)?;
    let booking = state
        .bookings
        .create(request.into(), Some(principal.user_id))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(booking.into())),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/track",
    tag = "Bookings",
    request_body = TrackBookingRequest,
    responses(
        (status = 200, description = "Booking found", body = ApiResponse<BookingDto>),
        (status = 404, description = "No booking with that tracking number")
    )
)]
pub async fn track_booking(
    State(state): State<BookingHandlerState>,
    ValidatedJson(request): ValidatedJson<TrackBookingRequest>,
) -> DomainResult<Json<ApiResponse<BookingDto>>> {
    let booking = state.bookings.track(&request.tracking_number).await?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/my",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(PaginationQuery),
    responses(
        (status = 200, description = "Caller's bookings", body = PaginatedResponse<BookingDto>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_bookings(
    State(state): State<BookingHandlerState>,
    principal: Option<Extension<Principal>>,
    Query(query): Query<PaginationQuery>,
) -> DomainResult<Json<PaginatedResponse<BookingDto>>> {
    let principal = require_principal(principal)?;
    let page = state
        .bookings
        .list_for_user(principal.user_id, &query.params())
        .await?;
    Ok(Json(PaginatedResponse::from_result(page, BookingDto::from)))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking details", body = ApiResponse<BookingDto>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is neither owner nor admin"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<BookingHandlerState>,
    Path(id): Path<i64>,
    principal: Option<Extension<Principal>>,
) -> DomainResult<Json<ApiResponse<BookingDto>>> {
    require_owner_or_admin(&state, id, principal).await?;
    let booking = state.bookings.get(id).await?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}/documents",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Documents linked to the booking", body = ApiResponse<Vec<BookingDocumentDto>>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is neither owner nor admin")
    )
)]
pub async fn booking_documents(
    State(state): State<BookingHandlerState>,
    Path(id): Path<i64>,
    principal: Option<Extension<Principal>>,
) -> DomainResult<Json<ApiResponse<Vec<BookingDocumentDto>>>> {
    require_owner_or_admin(&state, id, principal).await?;
    let documents = state.bookings.documents_for(id).await?;
    let dtos = documents.into_iter().map(BookingDocumentDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListBookingsQuery {
    /// Filter by status (case-insensitive)
    pub status: Option<String>,
    /// Filter by customer phone number
    pub phone_number: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(ListBookingsQuery),
    responses(
        (status = 200, description = "All bookings", body = PaginatedResponse<BookingDto>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Administrator role required")
    )
)]
pub async fn list_bookings(
    State(state): State<BookingHandlerState>,
    principal: Option<Extension<Principal>>,
    Query(query): Query<ListBookingsQuery>,
) -> DomainResult<Json<PaginatedResponse<BookingDto>>> {
    let principal = require_principal(principal)?;
    if !principal.is_admin() {
        return Err(DomainError::Forbidden(
            "Administrator role required".to_string(),
        ));
    }

    let params = PaginationQuery {
        page: query.page,
        limit: query.limit,
    }
    .params();

    let page = if let Some(phone_number) = query.phone_number.as_deref() {
        state
            .bookings
            .list_by_phone_number(phone_number, &params)
            .await?
    } else if let Some(status) = query.status.as_deref() {
        state.bookings.list_by_status(status, &params).await?
    } else {
        state.bookings.list_all(&params).await?
    };

    Ok(Json(PaginatedResponse::from_result(page, BookingDto::from)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{id}/status",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Booking id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<BookingDto>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn update_booking_status(
    State(state): State<BookingHandlerState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> DomainResult<Json<ApiResponse<BookingDto>>> {
    let booking = state
        .bookings
        .update_status(id, &request.status, request.notes)
        .await?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking deleted", body = ApiResponse<String>),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn delete_booking(
    State(state): State<BookingHandlerState>,
    Path(id): Path<i64>,
) -> DomainResult<Json<ApiResponse<()>>> {
    state.bookings.delete(id).await?;
    Ok(Json(ApiResponse::message("Booking deleted")))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/documents/upload",
    tag = "Bookings",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Documents stored", body = ApiResponse<Vec<BookingDocumentDto>>),
        (status = 400, description = "Malformed upload")
    )
)]
pub async fn upload_documents(
    State(state): State<BookingHandlerState>,
    mut multipart: Multipart,
) -> DomainResult<(StatusCode, Json<ApiResponse<Vec<BookingDocumentDto>>>)> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DomainError::InvalidState(format!("Malformed upload: {}", e)))?
    {
        let file_name = match field.file_name() {
            Some(name) => name.to_string(),
            // Non-file form fields are ignored.
            None => continue,
        };
        let content_type = field.content_type().map(String::from);
        let data = field
            .bytes()
            .await
            .map_err(|e| DomainError::InvalidState(format!("Malformed upload: {}", e)))?
            .to_vec();

        files.push(UploadedFile {
            file_name,
            content_type,
            data,
        });
    }

    let documents = state.documents.upload(files).await?;
    let dtos = documents.into_iter().map(BookingDocumentDto::from).collect();
    Ok((StatusCode::CREATED, Json(ApiResponse::success(dtos))))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/documents/{id}/download",
    tag = "Bookings",
    params(("id" = i64, Path, description = "Document id")),
    responses(
        (status = 200, description = "File content"),
        (status = 404, description = "Document not found")
    )
)]
pub async fn download_document(
    State(state): State<BookingHandlerState>,
    Path(id): Path<i64>,
) -> DomainResult<Response> {
    let (document, data) = state.documents.download(id).await?;

    let content_type = document
        .file_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let disposition = format!("attachment; filename=\"{}\"", document.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response())
}
