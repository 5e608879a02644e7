//! Entities module - Domain entities persisted in the database
//!
//! Each entity maps one-to-one onto a table created by `migrations/`.

pub mod item;
pub mod user;

pub use item::Item;
pub use user::User;
