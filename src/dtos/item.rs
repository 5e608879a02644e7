//! Item DTOs - Data Transfer Objects for items

use crate::entities::Item;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ItemDTO {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: i32,
}

impl From<Item> for ItemDTO {
    fn from(value: Item) -> Self {
        Self {
            id: value.item_id,
            title: value.title,
            description: value.description,
            owner_id: value.owner_id,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ItemsDTO {
    pub data: Vec<ItemDTO>,
    pub count: i64,
}

/// DTO for creating an item (owner comes from the authenticated user)
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateItemDTO {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,
    #[validate(length(max = 255))]
    pub description: Option<String>,
}

/// Row to insert: the request body plus the owner taken from the token
#[derive(Debug, Clone)]
pub struct NewItemDTO {
    pub title: String,
    pub description: Option<String>,
    pub owner_id: i32,
}

impl NewItemDTO {
    pub fn new(data: CreateItemDTO, owner_id: i32) -> Self {
        Self {
            title: data.title,
            description: data.description,
            owner_id,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateItemDTO {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 255))]
    pub description: Option<String>,
}
