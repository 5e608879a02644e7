//! Backend library - exposes the modules and the router for the binary and
//! the integration tests

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;

// Re-export of the main types
pub use crate::core::{AppError, AppState, auth, config};

use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Prefix shared by every API route
pub const API_V1_STR: &str = "/api/v1";

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    use services::*;

    let api = Router::new()
        .merge(configure_login_routes(state.clone()))
        .nest("/users", configure_user_routes(state.clone()))
        .nest("/items", configure_item_routes(state.clone()))
        .nest("/utils", Router::new().route("/health-check", get(health_check)));

    Router::new()
        .route("/", get(root))
        .nest(API_V1_STR, api)
        .layer(cors_layer(&state.config.backend_cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Token login and password recovery
fn configure_login_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    let public_routes = Router::new()
        .route("/login/access-token", post(login_access_token))
        .route("/password-recovery/{email}", post(recover_password))
        .route("/reset-password", post(reset_password));

    let authenticated_routes = Router::new()
        .route("/login/test-token", post(test_token))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    public_routes.merge(authenticated_routes)
}

/// User management: sign-up is public, `/me` needs a token, the rest needs a
/// superuser. Reading another user by id is checked in the handler.
fn configure_user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::{authentication_middleware, superuser_middleware};
    use services::*;

    let public_routes = Router::new().route("/signup", post(register_user));

    let authenticated_routes = Router::new()
        .route(
            "/me",
            get(read_user_me).patch(update_user_me).delete(delete_user_me),
        )
        .route("/me/password", axum::routing::patch(update_password_me))
        .route("/{user_id}", get(read_user_by_id))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authentication_middleware,
        ));

    let superuser_routes = Router::new()
        .route("/", get(read_users).post(create_user))
        .route(
            "/{user_id}",
            axum::routing::patch(update_user).delete(delete_user),
        )
        .layer(middleware::from_fn(superuser_middleware))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    public_routes
        .merge(authenticated_routes)
        .merge(superuser_routes)
}

fn configure_item_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/", get(read_items).post(create_item))
        .route(
            "/{item_id}",
            get(read_item).put(update_item).delete(delete_item),
        )
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}
