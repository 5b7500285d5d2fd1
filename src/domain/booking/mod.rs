pub mod model;
pub mod repository;

pub use model::{
    Booking, BookingDocument, BookingStatus, NewBooking, NewDocument, TRACKING_NUMBER_PREFIX,
};
pub use repository::{BookingDocumentRepository, BookingRepository};
