#![allow(dead_code)]

use axum_test::TestServer;
use backend::core::{AppState, Config, db};
use backend::dtos::{CreateUserDTO, TokenDTO};
use backend::entities::User;
use backend::repositories::Create;
use std::collections::HashMap;
use std::sync::Arc;

pub const JWT_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";
pub const SUPERUSER_EMAIL: &str = "admin@example.com";
pub const SUPERUSER_PASSWORD: &str = "adminpassword";

/// Configuration used by every test
pub fn test_config() -> Config {
    let env: HashMap<&str, &str> = HashMap::from([
        ("SECRET_KEY", JWT_SECRET),
        ("FIRST_SUPERUSER", SUPERUSER_EMAIL),
        ("FIRST_SUPERUSER_PASSWORD", SUPERUSER_PASSWORD),
        ("ACCESS_TOKEN_EXPIRE_MINUTES", "30"),
    ]);
    Config::from_lookup(|key| env.get(key).map(|v| v.to_string()))
        .expect("test configuration must be valid")
}

/// Fresh in-memory database with migrations applied and the first superuser
/// seeded
pub async fn create_test_state() -> Arc<AppState> {
    let pool = db::connect_in_memory()
        .await
        .expect("Failed to open in-memory database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to apply migrations");
    let state = Arc::new(AppState::new(pool, test_config()));
    db::init_db(&state).await.expect("Failed to seed superuser");
    state
}

pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = backend::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

pub async fn setup() -> (Arc<AppState>, TestServer) {
    let state = create_test_state().await;
    let server = create_test_server(state.clone());
    (state, server)
}

/// Insert a user straight through the repository
pub async fn insert_user(state: &AppState, email: &str, password: &str, superuser: bool) -> User {
    state
        .user
        .create(&CreateUserDTO {
            email: email.to_string(),
            password: User::hash_password(password).expect("hash"),
            full_name: None,
            is_active: true,
            is_superuser: superuser,
        })
        .await
        .expect("Failed to insert user")
}

/// Sign an access token for `user_id` with the test secret
pub fn create_test_jwt(user_id: i32) -> String {
    backend::core::encode_jwt(user_id, JWT_SECRET, 30).expect("Failed to create JWT token")
}

/// Log in through the API and return the access token
pub async fn login(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/api/v1/login/access-token")
        .form(&[("username", email), ("password", password)])
        .await;
    response.assert_status_ok();
    response.json::<TokenDTO>().access_token
}

pub async fn superuser_token(server: &TestServer) -> String {
    login(server, SUPERUSER_EMAIL, SUPERUSER_PASSWORD).await
}
