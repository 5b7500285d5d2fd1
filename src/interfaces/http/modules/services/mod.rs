pub mod dto;
pub mod handlers;

pub use dto::{SaveServiceRequest, ServiceDto};
pub use handlers::ServiceHandlerState;
