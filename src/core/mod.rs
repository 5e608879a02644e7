//! Core Module - infrastructure components of the application
//!
//! - Authentication and JWT
//! - Configuration
//! - Database bootstrap
//! - Error handling
//! - Application state

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod state;

pub use auth::{
    Claims, authentication_middleware, decode_jwt, encode_jwt, require_superuser,
    superuser_middleware,
};
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
