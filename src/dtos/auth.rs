//! Auth DTOs - login form, token and generic message bodies

use serde::{Deserialize, Serialize};
use validator::Validate;

/// OAuth2 password-flow form: `username` carries the email
#[derive(Deserialize, Debug)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TokenDTO {
    pub access_token: String,
    pub token_type: String,
}

impl TokenDTO {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Generic `{"message": ...}` body
#[derive(Serialize, Deserialize, Debug)]
pub struct MessageDTO {
    pub message: String,
}

impl MessageDTO {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct NewPasswordDTO {
    pub token: String,
    #[validate(length(min = 8, max = 40, message = "Password must be between 8 and 40 characters"))]
    pub new_password: String,
}
