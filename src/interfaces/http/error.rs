//! HTTP error boundary
//!
//! Handlers return `DomainError`; its `IntoResponse` impl records the status
//! and message as response extensions, and the outermost
//! [`render_api_errors`] middleware turns them into the final JSON body.
//! Splitting it this way lets the body carry the request path, which is not
//! available at `IntoResponse` time.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Error body returned to clients
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    /// When the error was produced (RFC 3339)
    pub timestamp: String,
    /// HTTP status code
    pub status: u16,
    /// Status reason phrase
    pub error: String,
    /// Human-readable message
    pub message: String,
    /// Path of the failing request
    pub path: String,
}

/// Carries the error through the middleware stack until the body is rendered.
#[derive(Debug, Clone)]
pub struct ErrorParts {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            DomainError::Conflict(_) => (StatusCode::CONFLICT, self.to_string()),
            DomainError::InvalidState(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            DomainError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            DomainError::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string()),
            DomainError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            DomainError::Database(ref detail) => {
                // Driver detail stays in the log, never in the response.
                error!("database failure: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let mut response = status.into_response();
        response
            .extensions_mut()
            .insert(ErrorParts { status, message });
        response
    }
}

/// Outermost middleware turning recorded error parts into the JSON body.
pub async fn render_api_errors(request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    let Some(parts) = response.extensions().get::<ErrorParts>().cloned() else {
        return response;
    };

    let body = ApiError {
        timestamp: Utc::now().to_rfc3339(),
        status: parts.status.as_u16(),
        error: parts
            .status
            .canonical_reason()
            .unwrap_or("Error")
            .to_string(),
        message: parts.message,
        path,
    };

    (parts.status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn failing_handler() -> Result<&'static str, DomainError> {
        Err(DomainError::not_found("Booking", "id", 42))
    }

    fn app() -> Router {
        Router::new()
            .route("/api/v1/bookings/{id}", get(failing_handler))
            .layer(middleware::from_fn(render_api_errors))
    }

    #[tokio::test]
    async fn domain_error_renders_full_body_with_path() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/bookings/42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], 404);
        assert_eq!(body["error"], "Not Found");
        assert_eq!(body["path"], "/api/v1/bookings/42");
        assert_eq!(body["message"], "Not found: Booking with id=42");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn database_detail_is_hidden_from_clients() {
        let response = DomainError::Database("UNIQUE constraint failed".to_string())
            .into_response();
        let parts = response.extensions().get::<ErrorParts>().unwrap();
        assert_eq!(parts.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!parts.message.contains("UNIQUE"));
    }
}
