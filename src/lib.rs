//! # PSN Booking Service
//!
//! REST backend for booking professional services: accounts, a service
//! catalog, bookings with human-readable tracking numbers, and document
//! attachments.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, types and repository traits
//! - **application**: Business logic and use cases
//! - **infrastructure**: External concerns (database, file storage)
//! - **interfaces**: REST API with Swagger documentation
//! - **auth**: JWT authentication, ownership checks and password hashing

pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::{init_database, DatabaseConfig, Migrator};

// Re-export API router
pub use interfaces::http::{create_api_router, ApiContext};
