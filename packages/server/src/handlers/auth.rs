//! Account handlers — `POST /api/auth/register` and `POST /api/auth/login`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use postboard::validate_credentials;
use postboard_api::{LoginRequest, RegisterRequest, TokenResponse, UserResponse};

use crate::{
    error::AppError,
    password::{hash_password, verify_password},
};

use super::{json_body, AppState};

const INVALID_CREDENTIALS: &str = "invalid username or password";

/// `POST /api/auth/register`: create an account.
///
/// Returns 409 if the username is taken.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let req = json_body(body)?;
    validate_credentials(&req.username, &req.password)?;

    let password = req.password;
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("task join error: {e}")))?
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

    let user = state.storage.create_user(&req.username, &hash).await?;
    tracing::info!(user_id = user.id, username = %user.username, "user registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// `POST /api/auth/login`: exchange credentials for a bearer token.
///
/// Unknown users and wrong passwords get the same 401.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let req = json_body(body)?;

    let user = state
        .storage
        .find_user_by_username(&req.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    let password = req.password;
    let hash = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("task join error: {e}")))?;
    if !verified {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let (token, expires_at) = state
        .tokens
        .issue(user.id, Utc::now())
        .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))?;
    tracing::info!(user_id = user.id, "user logged in");

    Ok(Json(TokenResponse::bearer(token, expires_at)))
}
