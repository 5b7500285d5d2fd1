pub mod gate;
pub mod jwt;
pub mod ownership;
pub mod password;

pub use gate::{AuthState, GateError, Principal};
pub use jwt::{JwtConfig, TokenClaims, TokenError, TokenType};
pub use ownership::OwnershipAuthorizer;
