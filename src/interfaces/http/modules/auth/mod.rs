pub mod dto;
pub mod handlers;

pub use dto::{LoginRequest, RefreshRequest, TokenResponse, UserInfo};
pub use handlers::AuthHandlerState;
