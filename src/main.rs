//!
//! REST backend for booking professional services.
//! Reads configuration from TOML file (~/.config/psn-booking/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use psn_booking::application::{
    BookingService, CatalogService, DocumentService, LogNotifier, UserService,
};
use psn_booking::auth::{AuthState, JwtConfig, OwnershipAuthorizer};
use psn_booking::config::AppConfig;
use psn_booking::infrastructure::database::repositories::{
    SeaOrmBookingDocumentRepository, SeaOrmBookingRepository, SeaOrmServiceRepository,
    SeaOrmUserRepository,
};
use psn_booking::infrastructure::storage::local::LocalFileStorage;
use psn_booking::{
    create_api_router, default_config_path, init_database, ApiContext, DatabaseConfig, Migrator,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("PSN_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting PSN Booking Service...");

    // ── Build sub-configs from AppConfig ───────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        access_token_minutes: app_cfg.security.access_token_minutes,
        refresh_token_days: app_cfg.security.refresh_token_days,
    };
    info!(
        "JWT configured: {}m access tokens, {}d refresh tokens",
        jwt_config.access_token_minutes, jwt_config.refresh_token_days
    );

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // Create default admin user if not exists
    create_default_admin(&db, &app_cfg).await;

    // ── Repositories ───────────────────────────────────────────
    let user_repo = Arc::new(SeaOrmUserRepository::new(db.clone()));
    let booking_repo = Arc::new(SeaOrmBookingRepository::new(db.clone()));
    let document_repo = Arc::new(SeaOrmBookingDocumentRepository::new(db.clone()));
    let service_repo = Arc::new(SeaOrmServiceRepository::new(db.clone()));

    let file_storage = match LocalFileStorage::new(&app_cfg.storage.upload_dir) {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            error!("Failed to initialize file storage: {}", e);
            return Err(e.into());
        }
    };
    info!("File storage directory: {}", app_cfg.storage.upload_dir);

    // ── Services ───────────────────────────────────────────────
    let notifier = Arc::new(LogNotifier);
    let user_service = Arc::new(UserService::new(user_repo.clone(), jwt_config.clone()));
    let booking_service = Arc::new(BookingService::new(
        booking_repo.clone(),
        document_repo.clone(),
        service_repo.clone(),
        notifier,
    ));
    let catalog_service = Arc::new(CatalogService::new(service_repo));
    let document_service = Arc::new(DocumentService::new(document_repo, file_storage));
    let ownership = OwnershipAuthorizer::new(booking_repo, user_repo.clone());
    let auth_state = AuthState {
        jwt_config: jwt_config.clone(),
        users: user_repo,
    };

    // ── REST API ───────────────────────────────────────────────
    let router = create_api_router(ApiContext {
        db: db.clone(),
        users: user_service,
        bookings: booking_service,
        catalog: catalog_service,
        documents: document_service,
        ownership,
        auth: auth_state,
        jwt_config,
    });

    let addr = format!("{}:{}", app_cfg.server.host, app_cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await?;

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    }

    info!("PSN Booking Service shutdown complete");
    Ok(())
}

/// Create default admin user if no users exist
async fn create_default_admin(db: &sea_orm::DatabaseConnection, app_cfg: &AppConfig) {
    use psn_booking::auth::password::hash_password;
    use psn_booking::infrastructure::database::entities::user::{self, UserRole};
    use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

    let users_count = user::Entity::find().count(db).await.unwrap_or(0);

    if users_count == 0 {
        info!("Creating default admin user...");

        let password_hash = match hash_password(&app_cfg.admin.password) {
            Ok(hash) => hash,
            Err(e) => {
                error!("Failed to hash admin password: {}", e);
                return;
            }
        };

        let now = chrono::Utc::now();
        let admin = user::ActiveModel {
            username: Set(app_cfg.admin.username.clone()),
            email: Set(app_cfg.admin.email.clone()),
            password_hash: Set(password_hash),
            full_name: Set(None),
            phone_number: Set(None),
            enabled: Set(true),
            role: Set(UserRole::Admin),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match admin.insert(db).await {
            Ok(created) => {
                info!("Default admin created: {}", created.email);
                info!("Please change the admin password immediately!");
            }
            Err(e) => {
                error!("Failed to create admin user: {}", e);
            }
        }
    }
}
