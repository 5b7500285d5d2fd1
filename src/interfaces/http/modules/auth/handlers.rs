//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, Json};

use super::dto::{LoginRequest, RefreshRequest, TokenResponse};
use crate::application::UserService;
use crate::auth::JwtConfig;
use crate::domain::DomainResult;
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub users: Arc<UserService>,
    pub jwt_config: JwtConfig,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> DomainResult<Json<ApiResponse<TokenResponse>>> {
    let (user, tokens) = state.users.login(&request.username, &request.password).await?;
    let response = TokenResponse::new(&user, tokens, state.jwt_config.access_token_minutes);
    Ok(Json(ApiResponse::success(response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "Authentication",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid or expired refresh token")
    )
)]
pub async fn refresh(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RefreshRequest>,
) -> DomainResult<Json<ApiResponse<TokenResponse>>> {
    let (user, tokens) = state.users.refresh(&request.refresh_token).await?;
    let response = TokenResponse::new(&user, tokens, state.jwt_config.access_token_minutes);
    Ok(Json(ApiResponse::success(response)))
}

/// Tokens are stateless, so logout is client-side token disposal. The
/// endpoint exists so clients have something to call.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<String>)
    )
)]
pub async fn logout() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message("Logged out successfully"))
}

/// Reachability probe for the auth endpoints.
#[utoipa::path(
    post,
    path = "/api/v1/auth/test",
    tag = "Authentication",
    responses(
        (status = 200, description = "Auth endpoints reachable", body = ApiResponse<String>)
    )
)]
pub async fn test() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message("Auth endpoints are reachable"))
}
