//! Item entity - item row owned by a user

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct Item {
    pub item_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: i32,
}
