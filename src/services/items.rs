//! Item services - CRUD on items
//!
//! Regular users only see and touch their own items, superusers see all.

use crate::core::{AppError, AppState};
use crate::dtos::{
    CreateItemDTO, ItemDTO, ItemsDTO, MessageDTO, NewItemDTO, PaginationQuery, UpdateItemDTO,
};
use crate::entities::{Item, User};
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Load an item the current user may access: 404 if missing, 403 if owned by
/// someone else and the user is not a superuser
async fn load_owned_item(
    state: &AppState,
    item_id: i32,
    current_user: &User,
) -> Result<Item, AppError> {
    let item = state
        .item
        .read(&item_id)
        .await?
        .ok_or_else(|| AppError::not_found("Item not found"))?;

    if !current_user.is_superuser && item.owner_id != current_user.user_id {
        warn!(
            "User {} tried to access item {} owned by {}",
            current_user.user_id, item_id, item.owner_id
        );
        return Err(AppError::forbidden("Not enough permissions"));
    }
    Ok(item)
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn read_items(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ItemsDTO>, AppError> {
    let params = params.normalized();
    let (items, count) = if current_user.is_superuser {
        futures::try_join!(
            state.item.list(params.skip, params.limit),
            state.item.count()
        )?
    } else {
        futures::try_join!(
            state
                .item
                .list_by_owner(&current_user.user_id, params.skip, params.limit),
            state.item.count_by_owner(&current_user.user_id)
        )?
    };

    debug!("Returning {} of {} items", items.len(), count);
    Ok(Json(ItemsDTO {
        data: items.into_iter().map(ItemDTO::from).collect(),
        count,
    }))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn read_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i32>,
    Extension(current_user): Extension<User>,
) -> Result<Json<ItemDTO>, AppError> {
    let item = load_owned_item(&state, item_id, &current_user).await?;
    Ok(Json(ItemDTO::from(item)))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<CreateItemDTO>,
) -> Result<Json<ItemDTO>, AppError> {
    body.validate()?;
    let item = state
        .item
        .create(&NewItemDTO::new(body, current_user.user_id))
        .await?;

    info!("Item {} created", item.item_id);
    Ok(Json(ItemDTO::from(item)))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i32>,
    Extension(current_user): Extension<User>,
    Json(body): Json<UpdateItemDTO>,
) -> Result<Json<ItemDTO>, AppError> {
    body.validate()?;
    load_owned_item(&state, item_id, &current_user).await?;

    let item = state.item.update(&item_id, &body).await?;
    info!("Item {} updated", item_id);
    Ok(Json(ItemDTO::from(item)))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i32>,
    Extension(current_user): Extension<User>,
) -> Result<Json<MessageDTO>, AppError> {
    load_owned_item(&state, item_id, &current_user).await?;

    state.item.delete(&item_id).await?;
    info!("Item {} deleted", item_id);
    Ok(Json(MessageDTO::new("Item deleted successfully")))
}
