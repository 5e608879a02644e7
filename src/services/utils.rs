//! Utility services - liveness endpoints

use crate::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        format!("{} is running!", state.config.project_name),
    )
}

pub async fn health_check() -> Json<bool> {
    Json(true)
}
