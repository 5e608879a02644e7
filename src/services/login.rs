//! Login services - access tokens and password recovery

use crate::core::auth::{generate_password_reset_token, verify_password_reset_token};
use crate::core::{AppError, AppState, encode_jwt};
use crate::dtos::{LoginForm, MessageDTO, NewPasswordDTO, TokenDTO, UserDTO};
use crate::entities::User;
use axum::{
    Extension, Form,
    extract::{Json, Path, State},
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// OAuth2 compatible token login: form fields `username` (the email) and
/// `password`
#[instrument(skip(state, form), fields(email = %form.username))]
pub async fn login_access_token(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenDTO>, AppError> {
    // 1. Look up the user by email
    // 2. Unknown user or wrong password get the same answer, and an unknown
    //    user still pays one bcrypt verify
    // 3. Inactive users cannot log in
    // 4. Sign an access token with the configured lifetime
    debug!("Login attempt");
    let verified = match state.user.find_by_email(&form.username).await? {
        Some(user) => user.verify_password(&form.password).then_some(user),
        None => {
            User::verify_dummy_password(&form.password);
            None
        }
    };
    let user = verified.ok_or_else(|| {
        warn!("Incorrect email or password");
        AppError::bad_request("Incorrect email or password")
    })?;

    if !user.is_active {
        warn!("Inactive user tried to log in");
        return Err(AppError::bad_request("Inactive user"));
    }

    let token = encode_jwt(
        user.user_id,
        &state.config.jwt_secret,
        state.config.access_token_expire_minutes,
    )?;

    info!("User {} logged in", user.user_id);
    Ok(Json(TokenDTO::bearer(token)))
}

/// Echo the user behind the bearer token
pub async fn test_token(Extension(current_user): Extension<User>) -> Json<UserDTO> {
    Json(UserDTO::from(current_user))
}

/// Issue a password-reset token for `email`. The reset link is written to
/// the log, the answer is identical whether or not the email is registered.
#[instrument(skip(state))]
pub async fn recover_password(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<MessageDTO>, AppError> {
    if state.user.find_by_email(&email).await?.is_some() {
        let token = generate_password_reset_token(
            &email,
            &state.config.jwt_secret,
            state.config.email_reset_token_expire_hours,
        )?;
        info!(
            "Password recovery link: {}/reset-password?token={}",
            state.config.frontend_host, token
        );
    } else {
        debug!("Password recovery requested for unknown email");
    }

    Ok(Json(MessageDTO::new(
        "If that email is registered, a password recovery link has been sent",
    )))
}

#[instrument(skip(state, body))]
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewPasswordDTO>,
) -> Result<Json<MessageDTO>, AppError> {
    body.validate()?;

    let email = verify_password_reset_token(&body.token, &state.config.jwt_secret)
        .ok_or_else(|| AppError::bad_request("Invalid token"))?;

    let user = state
        .user
        .find_by_email(&email)
        .await?
        .ok_or_else(|| {
            AppError::not_found("The user with this email does not exist in the system")
        })?;

    if !user.is_active {
        return Err(AppError::bad_request("Inactive user"));
    }

    let hashed_password = User::hash_password(&body.new_password)?;
    state
        .user
        .update_password(&user.user_id, &hashed_password)
        .await?;

    info!("Password reset for user {}", user.user_id);
    Ok(Json(MessageDTO::new("Password updated successfully")))
}
