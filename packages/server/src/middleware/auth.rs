//! Bearer-token authentication extractor.
//!
//! [`RequireAuth`] reads `Authorization: Bearer <token>`, verifies it with the
//! shared [`TokenIssuer`](crate::token::TokenIssuer), and yields the caller's
//! user id. Public endpoints simply do not take the extractor.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use postboard_api::ErrorResponse;

use crate::handlers::AppState;

// ---------------------------------------------------------------------------
// Auth errors
// ---------------------------------------------------------------------------

/// An authentication failure that maps to HTTP 401.
#[derive(Debug)]
pub struct AuthError(pub String);

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(ErrorResponse::new(self.0))).into_response()
    }
}

// ---------------------------------------------------------------------------
// RequireAuth extractor
// ---------------------------------------------------------------------------

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Axum extractor that requires a valid, unexpired bearer token.
///
/// Returns 401 if the header is absent, not a bearer credential, or the token
/// fails verification.
pub struct RequireAuth(pub AuthUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let app_state = AppState::from_ref(state);
        let token = bearer_token(parts).map(str::to_owned);
        async move {
            let token = token?;
            let user_id = app_state
                .tokens
                .verify(&token, chrono::Utc::now())
                .map_err(|e| {
                    tracing::debug!("rejected bearer token: {e}");
                    AuthError("invalid or expired token".into())
                })?;
            Ok(RequireAuth(AuthUser { user_id }))
        }
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AuthError("authorization header required".into()))?
        .to_str()
        .map_err(|_| AuthError("invalid authorization header".into()))?;

    let (scheme, token) = header
        .split_once(' ')
        .ok_or_else(|| AuthError("invalid authorization header".into()))?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError("invalid authorization header".into()));
    }
    Ok(token)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
