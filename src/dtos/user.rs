//! User DTOs - Data Transfer Objects for users

use crate::entities::User;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Public view of a user: the password hash never leaves the server
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserDTO {
    pub id: i32,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        Self {
            id: value.user_id,
            email: value.email,
            full_name: value.full_name,
            is_active: value.is_active,
            is_superuser: value.is_superuser,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UsersDTO {
    pub data: Vec<UserDTO>,
    pub count: i64,
}

/// DTO for creating a user (admin side). `password` is plaintext on the way
/// in and gets replaced by its hash before reaching the repository.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateUserDTO {
    #[validate(email(message = "Invalid email address"), length(max = 255))]
    pub email: String,
    #[validate(length(min = 8, max = 40, message = "Password must be between 8 and 40 characters"))]
    pub password: String,
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

fn default_true() -> bool {
    true
}

/// DTO for self sign-up: no privilege flags
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct RegisterUserDTO {
    #[validate(email(message = "Invalid email address"), length(max = 255))]
    pub email: String,
    #[validate(length(min = 8, max = 40, message = "Password must be between 8 and 40 characters"))]
    pub password: String,
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
}

impl From<RegisterUserDTO> for CreateUserDTO {
    fn from(value: RegisterUserDTO) -> Self {
        Self {
            email: value.email,
            password: value.password,
            full_name: value.full_name,
            is_active: true,
            is_superuser: false,
        }
    }
}

/// DTO for partial updates (only `Some(_)` fields are modified)
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateUserDTO {
    #[validate(email(message = "Invalid email address"), length(max = 255))]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 40, message = "Password must be between 8 and 40 characters"))]
    pub password: Option<String>,
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// Fields a user may change on their own account
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateUserMeDTO {
    #[validate(email(message = "Invalid email address"), length(max = 255))]
    pub email: Option<String>,
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
}

impl From<UpdateUserMeDTO> for UpdateUserDTO {
    fn from(value: UpdateUserMeDTO) -> Self {
        Self {
            email: value.email,
            full_name: value.full_name,
            ..Default::default()
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdatePasswordDTO {
    pub current_password: String,
    #[validate(length(min = 8, max = 40, message = "Password must be between 8 and 40 characters"))]
    pub new_password: String,
}
