use crate::core::{AppError, AppState};
use crate::entities::User;
use crate::repositories::Read;
use axum::extract::State;
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Content of an access token. `sub` is the user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize, // Expiry time of the token
    pub iat: usize, // Issued at time of the token
    pub sub: String,
}

/// Content of a password-reset token. `sub` is the email.
#[derive(Debug, Serialize, Deserialize)]
pub struct PasswordResetClaims {
    pub exp: usize,
    pub nbf: usize,
    pub sub: String,
}

/// Unix timestamp of `now + lifetime`, an error instead of an overflow panic
fn expiry(
    now: DateTime<Utc>,
    lifetime: Option<TimeDelta>,
) -> Result<usize, jsonwebtoken::errors::Error> {
    lifetime
        .and_then(|delta| now.checked_add_signed(delta))
        .map(|exp| exp.timestamp().max(0) as usize)
        .ok_or_else(|| {
            warn!("Token lifetime out of range");
            ErrorKind::MissingRequiredClaim("exp".to_string()).into()
        })
}

#[instrument(skip(secret))]
pub fn encode_jwt(
    user_id: i32,
    secret: &str,
    expire_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    debug!("Encoding access token");
    let now = Utc::now();
    let claims = Claims {
        iat: now.timestamp() as usize,
        exp: expiry(now, TimeDelta::try_minutes(expire_minutes))?,
        sub: user_id.to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(
    jwt_token: &str,
    secret: &str,
) -> Result<TokenData<Claims>, jsonwebtoken::errors::Error> {
    debug!("Decoding access token");
    decode(
        jwt_token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
}

#[instrument(skip(secret))]
pub fn generate_password_reset_token(
    email: &str,
    secret: &str,
    expire_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = PasswordResetClaims {
        nbf: now.timestamp() as usize,
        exp: expiry(now, TimeDelta::try_hours(expire_hours))?,
        sub: email.to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Returns the email the token was issued for, or None when the token is
/// malformed, expired or signed with another key
#[instrument(skip(token, secret))]
pub fn verify_password_reset_token(token: &str, secret: &str) -> Option<String> {
    let mut validation = Validation::default();
    validation.validate_nbf = true;
    validation.set_required_spec_claims(&["exp", "nbf", "sub"]);

    match decode::<PasswordResetClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => Some(data.claims.sub),
        Err(e) => {
            warn!("Rejected password reset token: {:?}", e);
            None
        }
    }
}

/// Resolves the bearer token to a `User` and stores it in the request
/// extensions, handlers read it with `Extension<User>`
#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            warn!("Missing authorization header");
            AppError::forbidden("Not authenticated")
        })?
        .to_str()
        .map_err(|_| {
            warn!("Invalid authorization header format");
            AppError::forbidden("Could not validate credentials")
        })?;

    let token = match auth_header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            token.trim()
        }
        _ => {
            warn!("Authorization header is not a bearer token");
            return Err(AppError::forbidden("Could not validate credentials"));
        }
    };

    let user_id = decode_jwt(token, &state.config.jwt_secret)
        .ok()
        .and_then(|data| data.claims.sub.parse::<i32>().ok())
        .ok_or_else(|| {
            warn!("Failed to decode JWT token");
            AppError::forbidden("Could not validate credentials")
        })?;

    let current_user = state.user.read(&user_id).await?.ok_or_else(|| {
        warn!("Token subject {} not found in database", user_id);
        AppError::not_found("User not found")
    })?;

    if !current_user.is_active {
        warn!("Inactive user {} tried to authenticate", user_id);
        return Err(AppError::bad_request("Inactive user"));
    }

    info!("User authenticated: {}", current_user.email);
    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}

/// Must be layered inside `authentication_middleware`: rejects requests whose
/// authenticated user is not a superuser
#[instrument(skip(req, next))]
pub async fn superuser_middleware(req: Request, next: Next) -> Result<Response<Body>, AppError> {
    let current_user = req.extensions().get::<User>().ok_or_else(|| {
        warn!("User not found in request extensions");
        AppError::forbidden("Not authenticated")
    })?;
    require_superuser(current_user)?;
    Ok(next.run(req).await)
}

pub fn require_superuser(user: &User) -> Result<(), AppError> {
    if !user.is_superuser {
        warn!("User {} lacks superuser privileges", user.user_id);
        return Err(AppError::forbidden("The user doesn't have enough privileges"));
    }
    Ok(())
}
