//! Application State - shared state handed to every route and middleware

use crate::core::Config;
use crate::repositories::{ItemRepository, PoolType, UserRepository};

pub struct AppState {
    /// Repository for users
    pub user: UserRepository,

    /// Repository for items
    pub item: ItemRepository,

    /// Settings loaded at startup (JWT secret, token lifetimes, ...)
    pub config: Config,
}

impl AppState {
    /// Build every repository on top of the shared connection pool
    pub fn new(pool: PoolType, config: Config) -> Self {
        Self {
            user: UserRepository::new(pool.clone()),
            item: ItemRepository::new(pool),
            config,
        }
    }
}
