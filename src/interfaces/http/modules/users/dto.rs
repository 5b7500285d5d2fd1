//! User DTOs

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::application::RegisterRequest;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserRequest {
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, max = 128, message = "password must be 6-128 characters"))]
    pub password: String,
    pub full_name: Option<String>,
    #[validate(length(max = 30, message = "phone number is too long"))]
    pub phone_number: Option<String>,
}

impl From<RegisterUserRequest> for RegisterRequest {
    fn from(request: RegisterUserRequest) -> Self {
        RegisterRequest {
            username: request.username,
            email: request.email,
            password: request.password,
            full_name: request.full_name,
            phone_number: request.phone_number,
        }
    }
}
