//! Repositories module - database access for every entity
//!
//! Each repository owns a clone of the connection pool and exposes the CRUD
//! traits from [`traits`] plus the entity-specific queries handlers need.
//!
//! Queries use the runtime-checked `sqlx::query_as::<_, T>` form together with
//! `#[derive(FromRow)]` entities.

pub mod item;
pub mod traits;
pub mod user;

pub use traits::{Create, Delete, Read, Update};

pub use item::ItemRepository;
pub use user::UserRepository;

use sqlx::SqlitePool;

// alias for the pool type shared by every repository
pub type PoolType = SqlitePool;
