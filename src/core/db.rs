//! Database bootstrap - pool creation, migrations and initial data

use crate::core::{AppState, Config};
use crate::dtos::CreateUserDTO;
use crate::entities::User;
use crate::repositories::{Create, PoolType};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info, instrument};

pub async fn connect(config: &Config) -> Result<PoolType, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
}

/// Private in-memory database. A single connection that is never recycled,
/// otherwise every new connection would see an empty database.
pub async fn connect_in_memory() -> Result<PoolType, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

pub async fn run_migrations(pool: &PoolType) -> Result<(), sqlx::migrate::MigrateError> {
    debug!("Applying migrations");
    sqlx::migrate!("./migrations").run(pool).await
}

/// Create the first superuser from the configuration if it does not exist yet
#[instrument(skip(state), fields(email = %state.config.first_superuser))]
pub async fn init_db(state: &AppState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if state
        .user
        .find_by_email(&state.config.first_superuser)
        .await?
        .is_some()
    {
        debug!("First superuser already present");
        return Ok(());
    }

    let superuser = CreateUserDTO {
        email: state.config.first_superuser.clone(),
        password: User::hash_password(&state.config.first_superuser_password)?,
        full_name: None,
        is_active: true,
        is_superuser: true,
    };
    state.user.create(&superuser).await?;
    info!("First superuser created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_init_db_is_idempotent() {
        let pool = connect_in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            ("FIRST_SUPERUSER", "root@example.com"),
            ("FIRST_SUPERUSER_PASSWORD", "rootpassword"),
        ]);
        let config = Config::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        let state = AppState::new(pool, config);

        init_db(&state).await.unwrap();
        init_db(&state).await.unwrap();

        assert_eq!(state.user.count().await.unwrap(), 1);
        let root = state.user.find_by_email("root@example.com").await.unwrap().unwrap();
        assert!(root.is_superuser);
        assert!(root.verify_password("rootpassword"));
    }
}
