pub mod booking;
pub mod documents;
pub mod notify;
pub mod services;
pub mod users;

pub use booking::{BookingRequest, BookingService};
pub use documents::DocumentService;
pub use notify::{LogNotifier, Notifier};
pub use services::CatalogService;
pub use users::{RegisterRequest, TokenPair, UserService};
