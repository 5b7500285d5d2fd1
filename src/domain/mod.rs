pub mod booking;
pub mod error;
pub mod service;
pub mod user;

// Re-export commonly used types
pub use booking::{
    Booking, BookingDocument, BookingDocumentRepository, BookingRepository, BookingStatus,
    NewBooking, NewDocument, TRACKING_NUMBER_PREFIX,
};
pub use error::{DomainError, DomainResult};
pub use service::{NewServiceOffering, ServiceOffering, ServiceRepository};
pub use user::{NewUser, User, UserRepository, UserRole};
