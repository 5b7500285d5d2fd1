//! User API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};

use super::dto::RegisterUserRequest;
use crate::application::UserService;
use crate::auth::Principal;
use crate::domain::{DomainError, DomainResult};
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};
use crate::interfaces::http::modules::auth::UserInfo;

/// User handler state
#[derive(Clone)]
pub struct UserHandlerState {
    pub users: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    tag = "Users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserInfo>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn register(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterUserRequest>,
) -> DomainResult<(StatusCode, Json<ApiResponse<UserInfo>>)> {
    let user = state.users.register(request.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserInfo::from_user(&user))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current account", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<UserHandlerState>,
    principal: Option<Extension<Principal>>,
) -> DomainResult<Json<ApiResponse<UserInfo>>> {
    let Some(Extension(principal)) = principal else {
        return Err(DomainError::Unauthorized(
            "Full authentication is required".to_string(),
        ));
    };

    let user = state.users.get_by_username(&principal.username).await?;
    Ok(Json(ApiResponse::success(UserInfo::from_user(&user))))
}
