//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{BookingService, CatalogService, DocumentService, UserService};
use crate::auth::gate::{authentication_gate, require_admin, require_auth};
use crate::auth::{AuthState, JwtConfig, OwnershipAuthorizer};
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::interfaces::http::error::{render_api_errors, ApiError};
use crate::interfaces::http::modules::{auth, bookings, health, services, users};

/// Everything the HTTP layer needs, assembled at startup.
#[derive(Clone)]
pub struct ApiContext {
    pub db: DatabaseConnection,
    pub users: Arc<UserService>,
    pub bookings: Arc<BookingService>,
    pub catalog: Arc<CatalogService>,
    pub documents: Arc<DocumentService>,
    pub ownership: OwnershipAuthorizer,
    pub auth: AuthState,
    pub jwt_config: JwtConfig,
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Auth
        auth::handlers::login,
        auth::handlers::refresh,
        auth::handlers::logout,
        auth::handlers::test,
        // Users
        users::handlers::register,
        users::handlers::me,
        // Services
        services::handlers::list_services,
        services::handlers::get_service,
        services::handlers::create_service,
        services::handlers::update_service,
        // Bookings
        bookings::handlers::create_public_booking,
        bookings::handlers::create_booking,
        bookings::handlers::track_booking,
        bookings::handlers::my_bookings,
        bookings::handlers::get_booking,
        bookings::handlers::booking_documents,
        bookings::handlers::list_bookings,
        bookings::handlers::update_booking_status,
        bookings::handlers::delete_booking,
        bookings::handlers::upload_documents,
        bookings::handlers::download_document,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<bookings::BookingDto>,
            ApiError,
            // Health
            health::handlers::HealthResponse,
            health::handlers::ComponentHealth,
            // Auth
            auth::LoginRequest,
            auth::RefreshRequest,
            auth::TokenResponse,
            auth::UserInfo,
            // Users
            users::RegisterUserRequest,
            // Services
            services::ServiceDto,
            services::SaveServiceRequest,
            // Bookings
            bookings::BookingDto,
            bookings::BookingDocumentDto,
            bookings::CreateBookingRequest,
            bookings::TrackBookingRequest,
            bookings::UpdateStatusRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "Login, token refresh and logout"),
        (name = "Users", description = "Account registration and profile"),
        (name = "Services", description = "Bookable service catalog"),
        (name = "Bookings", description = "Booking lifecycle, tracking and documents"),
    ),
    info(
        title = "PSN Booking API",
        version = "1.0.0",
        description = "REST API for booking professional services",
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(context: ApiContext) -> Router {
    let auth_state = auth::AuthHandlerState {
        users: context.users.clone(),
        jwt_config: context.jwt_config.clone(),
    };
    let user_state = users::UserHandlerState {
        users: context.users.clone(),
    };
    let service_state = services::ServiceHandlerState {
        catalog: context.catalog.clone(),
    };
    let booking_state = bookings::BookingHandlerState {
        bookings: context.bookings.clone(),
        documents: context.documents.clone(),
        ownership: context.ownership.clone(),
    };
    let health_state = health::HealthState {
        db: context.db.clone(),
        started_at: Arc::new(Instant::now()),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/login", post(auth::handlers::login))
        .route("/refresh", post(auth::handlers::refresh))
        .route("/logout", post(auth::handlers::logout))
        .route("/test", post(auth::handlers::test))
        .with_state(auth_state);

    let user_routes = Router::new()
        .route("/register", post(users::handlers::register))
        .route("/me", get(users::handlers::me))
        .with_state(user_state);

    // Read endpoints are open at the routing level; admin writes are gated.
    let service_routes = Router::new()
        .route("/", get(services::handlers::list_services))
        .route("/{id}", get(services::handlers::get_service))
        .merge(
            Router::new()
                .route("/", post(services::handlers::create_service))
                .route("/{id}", put(services::handlers::update_service))
                .route_layer(middleware::from_fn(require_admin)),
        )
        .with_state(service_state);

    // Reads enforce owner-or-admin inside the handlers; the authenticated
    // create and the admin mutations carry route-level guards.
    let booking_routes = Router::new()
        .route("/public", post(bookings::handlers::create_public_booking))
        .route("/track", post(bookings::handlers::track_booking))
        .route("/documents/upload", post(bookings::handlers::upload_documents))
        .route(
            "/documents/{id}/download",
            get(bookings::handlers::download_document),
        )
        .route("/my", get(bookings::handlers::my_bookings))
        .route("/", get(bookings::handlers::list_bookings))
        .route("/{id}", get(bookings::handlers::get_booking))
        .route("/{id}/documents", get(bookings::handlers::booking_documents))
        .merge(
            Router::new()
                .route("/", post(bookings::handlers::create_booking))
                .route_layer(middleware::from_fn(require_auth)),
        )
        .merge(
            Router::new()
                .route(
                    "/{id}/status",
                    patch(bookings::handlers::update_booking_status),
                )
                .route("/{id}", delete(bookings::handlers::delete_booking))
                .route_layer(middleware::from_fn(require_admin)),
        )
        .with_state(booking_state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .merge(
            Router::new()
                .route("/health", get(health::handlers::health_check))
                .with_state(health_state),
        )
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/users", user_routes)
        .nest("/api/v1/services", service_routes)
        .nest("/api/v1/bookings", booking_routes)
        // The gate runs on every request; the error renderer wraps it so
        // guard rejections get the same body shape as handler errors.
        .layer(middleware::from_fn_with_state(
            context.auth.clone(),
            authentication_gate,
        ))
        .layer(middleware::from_fn(render_api_errors))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::application::LogNotifier;
    use crate::auth::jwt::issue_access_token;
    use crate::domain::{NewServiceOffering, NewUser, ServiceRepository, UserRole};
    use crate::infrastructure::memory::{
        InMemoryBookingDocumentRepository, InMemoryBookingRepository, InMemoryServiceRepository,
        InMemoryUserRepository,
    };
    use crate::infrastructure::storage::InMemoryFileStorage;

    /// Full router over in-memory collaborators, with one active service and
    /// one regular (non-admin) account "alice".
    async fn test_router() -> (Router, String) {
        let users = Arc::new(InMemoryUserRepository::new());
        let bookings = Arc::new(InMemoryBookingRepository::new());
        let documents = Arc::new(InMemoryBookingDocumentRepository::new());
        let services = Arc::new(InMemoryServiceRepository::new());

        services
            .insert(NewServiceOffering {
                title: "Document notarization".to_string(),
                description: None,
                active: true,
                turnaround_time: None,
                price_info: None,
            })
            .await
            .unwrap();
        users
            .seed(
                NewUser {
                    username: "alice".to_string(),
                    email: "alice@example.com".to_string(),
                    password_hash: "hash".to_string(),
                    full_name: None,
                    phone_number: None,
                    role: UserRole::User,
                },
                true,
            )
            .await;

        let jwt_config = JwtConfig {
            secret: "router-test-secret".to_string(),
            access_token_minutes: 60,
            refresh_token_days: 7,
        };
        let alice_token = issue_access_token("alice", &jwt_config).unwrap();

        let user_service = Arc::new(UserService::new(users.clone(), jwt_config.clone()));
        let booking_service = Arc::new(BookingService::new(
            bookings.clone(),
            documents.clone(),
            services.clone(),
            Arc::new(LogNotifier),
        ));
        let catalog = Arc::new(CatalogService::new(services));
        let document_service = Arc::new(DocumentService::new(
            documents,
            Arc::new(InMemoryFileStorage::new()),
        ));
        let ownership = OwnershipAuthorizer::new(bookings, users.clone());
        let auth = AuthState {
            jwt_config: jwt_config.clone(),
            users,
        };

        let router = create_api_router(ApiContext {
            db: sea_orm::DatabaseConnection::default(),
            users: user_service,
            bookings: booking_service,
            catalog,
            documents: document_service,
            ownership,
            auth,
            jwt_config,
        });
        (router, alice_token)
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn public_booking_creation_end_to_end() {
        let (router, _) = test_router().await;
        let request = json_request(
            "POST",
            "/api/v1/bookings/public",
            serde_json::json!({"service_id": 1, "phone_number": "+250788000111"}),
        );

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["tracking_number"], "PSN-001");
        assert_eq!(body["data"]["status"], "PENDING");
        assert!(body["data"]["user_id"].is_null());
    }

    #[tokio::test]
    async fn authenticated_creation_requires_a_token() {
        let (router, _) = test_router().await;
        let request = json_request(
            "POST",
            "/api/v1/bookings",
            serde_json::json!({"service_id": 1, "phone_number": "+250788000111"}),
        );

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["status"], 401);
        assert_eq!(body["path"], "/api/v1/bookings");
    }

    #[tokio::test]
    async fn authenticated_creation_attaches_the_caller_as_owner() {
        let (router, token) = test_router().await;
        let mut request = json_request(
            "POST",
            "/api/v1/bookings",
            serde_json::json!({"service_id": 1, "phone_number": "+250788000111"}),
        );
        request.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {}", token).parse().unwrap(),
        );

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert!(body["data"]["user_id"].is_i64());
    }

    #[tokio::test]
    async fn admin_routes_reject_regular_accounts() {
        let (router, token) = test_router().await;
        let mut request = json_request(
            "PATCH",
            "/api/v1/bookings/1/status",
            serde_json::json!({"status": "approved"}),
        );
        request.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {}", token).parse().unwrap(),
        );

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn owner_gated_reads_reject_because_gets_carry_no_principal() {
        let (router, token) = test_router().await;
        let mut request = Request::builder()
            .method("GET")
            .uri("/api/v1/bookings/my")
            .body(Body::empty())
            .unwrap();
        request.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {}", token).parse().unwrap(),
        );

        // The gate bypasses every GET, so even a valid token never becomes
        // a principal and the handler's own check fires.
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn service_catalog_is_publicly_readable() {
        let (router, _) = test_router().await;
        let request = Request::builder()
            .uri("/api/v1/services")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }
}
