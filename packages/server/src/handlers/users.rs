//! `GET /api/users/me`.

use axum::{extract::State, Json};
use postboard_api::UserResponse;

use crate::{error::AppError, middleware::auth::RequireAuth};

use super::AppState;

/// Return the authenticated caller's account. 404 if the account behind a
/// still-valid token no longer exists.
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .storage
        .find_user(caller.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(user.into()))
}
