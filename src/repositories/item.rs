//! ItemRepository - persistence for items

use super::{Create, Delete, PoolType, Read, Update};
use crate::dtos::{NewItemDTO, UpdateItemDTO};
use crate::entities::Item;
use sqlx::Error;
use tracing::{debug, info, instrument};

pub struct ItemRepository {
    connection_pool: PoolType,
}

impl ItemRepository {
    pub fn new(connection_pool: PoolType) -> Self {
        Self { connection_pool }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Item>, Error> {
        debug!("Listing all items");
        sqlx::query_as::<_, Item>(
            r#"
            SELECT item_id, title, description, owner_id
            FROM items
            ORDER BY item_id
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn count(&self) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items")
            .fetch_one(&self.connection_pool)
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_by_owner(
        &self,
        owner_id: &i32,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Item>, Error> {
        debug!("Listing items by owner");
        sqlx::query_as::<_, Item>(
            r#"
            SELECT item_id, title, description, owner_id
            FROM items
            WHERE owner_id = ?
            ORDER BY item_id
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn count_by_owner(&self, owner_id: &i32) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(&self.connection_pool)
            .await
    }
}

impl Create<Item, NewItemDTO> for ItemRepository {
    #[instrument(skip(self, data), fields(owner_id = %data.owner_id))]
    async fn create(&self, data: &NewItemDTO) -> Result<Item, Error> {
        debug!("Creating new item");
        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (title, description, owner_id)
            VALUES (?, ?, ?)
            RETURNING item_id, title, description, owner_id
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.owner_id)
        .fetch_one(&self.connection_pool)
        .await?;

        info!("Item created with id {}", item.item_id);
        Ok(item)
    }
}

impl Read<Item, i32> for ItemRepository {
    #[instrument(skip(self), fields(item_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<Item>, Error> {
        sqlx::query_as::<_, Item>(
            "SELECT item_id, title, description, owner_id FROM items WHERE item_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Update<Item, UpdateItemDTO, i32> for ItemRepository {
    #[instrument(skip(self, data), fields(item_id = %id))]
    async fn update(&self, id: &i32, data: &UpdateItemDTO) -> Result<Item, Error> {
        debug!("Updating item");
        let item = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items SET
                title = COALESCE(?, title),
                description = COALESCE(?, description)
            WHERE item_id = ?
            RETURNING item_id, title, description, owner_id
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?
        .ok_or(Error::RowNotFound)?;

        info!("Item updated");
        Ok(item)
    }
}

impl Delete<i32> for ItemRepository {
    #[instrument(skip(self))]
    async fn delete(&self, item_id: &i32) -> Result<(), Error> {
        sqlx::query("DELETE FROM items WHERE item_id = ?")
            .bind(item_id)
            .execute(&self.connection_pool)
            .await?;

        info!("Item deleted");
        Ok(())
    }
}
