//! Common repository traits
//!
//! Generic interfaces shared by the repositories. Entity-specific queries
//! (lookups by email, pagination by owner, ...) stay as inherent methods.

/// Insert a new row and return the stored entity
///
/// `CreateDTO` carries every column except the generated primary key.
pub trait Create<Entity, CreateDTO> {
    async fn create(&self, data: &CreateDTO) -> Result<Entity, sqlx::Error>;
}

/// Look up a single entity by primary key
///
/// Returns `Ok(None)` when no row matches.
pub trait Read<Entity, Id> {
    async fn read(&self, id: &Id) -> Result<Option<Entity>, sqlx::Error>;
}

/// Partial update: only the `Some(_)` fields of `UpdateDTO` are written
///
/// # Returns
/// * `Ok(Entity)` - the row after the update
/// * `Err(sqlx::Error::RowNotFound)` - no row with that id
pub trait Update<Entity, UpdateDTO, Id> {
    async fn update(&self, id: &Id, data: &UpdateDTO) -> Result<Entity, sqlx::Error>;
}

/// Remove a row by primary key. Deleting a missing row is not an error.
pub trait Delete<Id> {
    async fn delete(&self, id: &Id) -> Result<(), sqlx::Error>;
}
