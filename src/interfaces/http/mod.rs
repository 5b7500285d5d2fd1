//! HTTP REST API interfaces
//!
//! - `common`: Response envelopes and the validating JSON extractor
//! - `error`: Domain-error-to-HTTP translation
//! - `modules`: Request handlers for all resources
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod error;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiContext};
