pub mod dto;
pub mod handlers;

pub use dto::RegisterUserRequest;
pub use handlers::UserHandlerState;
