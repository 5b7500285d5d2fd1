//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories behind the domain repository traits.

pub mod booking_repository;
pub mod document_repository;
pub mod service_repository;
pub mod user_repository;

pub use booking_repository::SeaOrmBookingRepository;
pub use document_repository::SeaOrmBookingDocumentRepository;
pub use service_repository::SeaOrmServiceRepository;
pub use user_repository::SeaOrmUserRepository;
