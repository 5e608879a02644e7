//! User services - account management

use crate::core::{AppError, AppState};
use crate::dtos::{
    CreateUserDTO, MessageDTO, PaginationQuery, RegisterUserDTO, UpdatePasswordDTO, UpdateUserDTO,
    UpdateUserMeDTO, UserDTO, UsersDTO,
};
use crate::entities::User;
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
};
use axum_macros::debug_handler;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Fails with CONFLICT when `email` belongs to a user other than `except`
async fn ensure_email_available(
    state: &AppState,
    email: &str,
    except: Option<i32>,
) -> Result<(), AppError> {
    match state.user.find_by_email(email).await? {
        Some(existing) if Some(existing.user_id) != except => {
            warn!("Email already registered");
            Err(AppError::conflict(
                "The user with this email already exists in the system",
            ))
        }
        _ => Ok(()),
    }
}

/// Validate, check uniqueness, hash and store
async fn insert_user(state: &AppState, body: CreateUserDTO) -> Result<User, AppError> {
    body.validate()?;
    ensure_email_available(state, &body.email, None).await?;

    let new_user = CreateUserDTO {
        password: User::hash_password(&body.password)?,
        ..body
    };
    Ok(state.user.create(&new_user).await?)
}

#[instrument(skip(state))]
pub async fn read_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<UsersDTO>, AppError> {
    let params = params.normalized();
    let (users, count) = futures::try_join!(
        state.user.list(params.skip, params.limit),
        state.user.count()
    )?;

    debug!("Returning {} of {} users", users.len(), count);
    Ok(Json(UsersDTO {
        data: users.into_iter().map(UserDTO::from).collect(),
        count,
    }))
}

#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateUserDTO>,
) -> Result<Json<UserDTO>, AppError> {
    let user = insert_user(&state, body).await?;
    info!("User {} created by superuser", user.user_id);
    Ok(Json(UserDTO::from(user)))
}

/// Public sign-up: always an active, non-superuser account
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterUserDTO>,
) -> Result<Json<UserDTO>, AppError> {
    let user = insert_user(&state, CreateUserDTO::from(body)).await?;
    info!("User {} signed up", user.user_id);
    Ok(Json(UserDTO::from(user)))
}

#[debug_handler]
pub async fn read_user_me(Extension(current_user): Extension<User>) -> Json<UserDTO> {
    Json(UserDTO::from(current_user))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn update_user_me(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<UpdateUserMeDTO>,
) -> Result<Json<UserDTO>, AppError> {
    body.validate()?;
    if let Some(email) = &body.email {
        ensure_email_available(&state, email, Some(current_user.user_id)).await?;
    }

    let updated = state
        .user
        .update(&current_user.user_id, &UpdateUserDTO::from(body))
        .await?;
    info!("User updated own profile");
    Ok(Json(UserDTO::from(updated)))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn update_password_me(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<UpdatePasswordDTO>,
) -> Result<Json<MessageDTO>, AppError> {
    // 1. Validate the new password before any hashing work
    // 2. The current password must match
    // 3. The new password must differ from the current one
    // 4. Hash and store
    body.validate()?;
    if !current_user.verify_password(&body.current_password) {
        warn!("Wrong current password");
        return Err(AppError::bad_request("Incorrect password"));
    }
    if body.current_password == body.new_password {
        return Err(AppError::bad_request(
            "New password cannot be the same as the current one",
        ));
    }

    let hashed_password = User::hash_password(&body.new_password)?;
    state
        .user
        .update_password(&current_user.user_id, &hashed_password)
        .await?;

    info!("Password changed");
    Ok(Json(MessageDTO::new("Password updated successfully")))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn delete_user_me(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<MessageDTO>, AppError> {
    if current_user.is_superuser {
        warn!("Superuser tried to delete own account");
        return Err(AppError::forbidden(
            "Super users are not allowed to delete themselves",
        ));
    }

    // items are removed by ON DELETE CASCADE
    state.user.delete(&current_user.user_id).await?;
    info!("Account deleted");
    Ok(Json(MessageDTO::new("User deleted successfully")))
}

#[instrument(skip(state, current_user), fields(current = %current_user.user_id))]
pub async fn read_user_by_id(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    Extension(current_user): Extension<User>,
) -> Result<Json<UserDTO>, AppError> {
    if user_id == current_user.user_id {
        return Ok(Json(UserDTO::from(current_user)));
    }
    if !current_user.is_superuser {
        return Err(AppError::forbidden("The user doesn't have enough privileges"));
    }

    let user = state
        .user
        .read(&user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(UserDTO::from(user)))
}

#[instrument(skip(state, body))]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    Json(body): Json<UpdateUserDTO>,
) -> Result<Json<UserDTO>, AppError> {
    body.validate()?;

    if state.user.read(&user_id).await?.is_none() {
        return Err(AppError::not_found(
            "The user with this id does not exist in the system",
        ));
    }
    if let Some(email) = &body.email {
        ensure_email_available(&state, email, Some(user_id)).await?;
    }

    let password = match &body.password {
        Some(password) => Some(User::hash_password(password)?),
        None => None,
    };
    let update = UpdateUserDTO { password, ..body };

    let updated = state.user.update(&user_id, &update).await?;
    info!("User {} updated by superuser", user_id);
    Ok(Json(UserDTO::from(updated)))
}

#[instrument(skip(state, current_user), fields(current = %current_user.user_id))]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    Extension(current_user): Extension<User>,
) -> Result<Json<MessageDTO>, AppError> {
    if state.user.read(&user_id).await?.is_none() {
        return Err(AppError::not_found("User not found"));
    }
    if user_id == current_user.user_id {
        return Err(AppError::forbidden(
            "Super users are not allowed to delete themselves",
        ));
    }

    state.user.delete(&user_id).await?;
    info!("User {} deleted by superuser", user_id);
    Ok(Json(MessageDTO::new("User deleted successfully")))
}
