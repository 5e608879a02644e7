//! User entity - user row with password hashing helpers

use bcrypt::{DEFAULT_COST, hash, verify};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// well-formed cost-12 bcrypt hash that matches no password
const DUMMY_PASSWORD_HASH: &str =
    "$2b$12$abcdefghijklmnopqrstu.abcdefghijklmnopqrstuvwxyzABCD.";

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct User {
    pub user_id: i32,
    pub email: String,
    /// bcrypt hash, never exposed through a DTO
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
}

impl User {
    /// Verify if target_password matches the stored hashed password
    pub fn verify_password(&self, target_password: &str) -> bool {
        verify(target_password, &self.hashed_password).unwrap_or(false)
    }

    /// Spend the same bcrypt work as `verify_password` when there is no user
    /// to check against. Always false.
    pub fn verify_dummy_password(target_password: &str) -> bool {
        verify(target_password, DUMMY_PASSWORD_HASH).unwrap_or(false)
    }

    /// Hash a password using bcrypt with default cost
    pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
        let hash = hash(password, DEFAULT_COST)?;
        Ok(hash)
    }
}
