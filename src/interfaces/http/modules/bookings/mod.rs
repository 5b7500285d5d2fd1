pub mod dto;
pub mod handlers;

pub use dto::{
    BookingDocumentDto, BookingDto, CreateBookingRequest, TrackBookingRequest, UpdateStatusRequest,
};
pub use handlers::BookingHandlerState;
