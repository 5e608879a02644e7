//! UserRepository - persistence for users

use super::{Create, Delete, PoolType, Read, Update};
use crate::dtos::{CreateUserDTO, UpdateUserDTO};
use crate::entities::User;
use sqlx::Error;
use tracing::{debug, info, instrument};

const USER_COLUMNS: &str = "user_id, email, hashed_password, full_name, is_active, is_superuser";

pub struct UserRepository {
    connection_pool: PoolType,
}

impl UserRepository {
    pub fn new(connection_pool: PoolType) -> UserRepository {
        Self { connection_pool }
    }

    /// Email is the login identifier and is unique
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        debug!("Finding user by email");
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<User>, Error> {
        debug!("Listing users");
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY user_id LIMIT ? OFFSET ?"
        ))
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn count(&self) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.connection_pool)
            .await
    }

    /// Store a new password hash (the caller does the hashing)
    #[instrument(skip(self, hashed_password))]
    pub async fn update_password(&self, user_id: &i32, hashed_password: &str) -> Result<(), Error> {
        let result = sqlx::query("UPDATE users SET hashed_password = ? WHERE user_id = ?")
            .bind(hashed_password)
            .bind(user_id)
            .execute(&self.connection_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }
        info!("Password updated");
        Ok(())
    }
}

impl Create<User, CreateUserDTO> for UserRepository {
    /// `data.password` must already be a bcrypt hash
    #[instrument(skip(self, data), fields(email = %data.email))]
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        debug!("Creating new user");
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, hashed_password, full_name, is_active, is_superuser)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&data.email)
        .bind(&data.password)
        .bind(&data.full_name)
        .bind(data.is_active)
        .bind(data.is_superuser)
        .fetch_one(&self.connection_pool)
        .await?;

        info!("User created with id {}", user.user_id);
        Ok(user)
    }
}

impl Read<User, i32> for UserRepository {
    #[instrument(skip(self), fields(user_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<User>, Error> {
        debug!("Reading user by id");
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Update<User, UpdateUserDTO, i32> for UserRepository {
    /// `data.password`, when present, must already be a bcrypt hash
    #[instrument(skip(self, data), fields(user_id = %id))]
    async fn update(&self, id: &i32, data: &UpdateUserDTO) -> Result<User, Error> {
        debug!("Updating user");
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                email = COALESCE(?, email),
                hashed_password = COALESCE(?, hashed_password),
                full_name = COALESCE(?, full_name),
                is_active = COALESCE(?, is_active),
                is_superuser = COALESCE(?, is_superuser)
            WHERE user_id = ?
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&data.email)
        .bind(&data.password)
        .bind(&data.full_name)
        .bind(data.is_active)
        .bind(data.is_superuser)
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?
        .ok_or(Error::RowNotFound)?;

        info!("User updated");
        Ok(user)
    }
}

impl Delete<i32> for UserRepository {
    /// Hard delete. Owned items go with it through ON DELETE CASCADE.
    #[instrument(skip(self))]
    async fn delete(&self, user_id: &i32) -> Result<(), Error> {
        sqlx::query("DELETE FROM users WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.connection_pool)
            .await?;

        info!("User deleted");
        Ok(())
    }
}
