//! HTTP request handlers for all Postboard endpoints.
//!
//! Each submodule covers a logical group of endpoints. Handlers are pure async
//! functions that receive Axum extractors and return
//! `Result<impl IntoResponse, AppError>`.
//!
//! All authorization logic (ownership checks) lives here, not in storage.

pub mod auth;
pub mod comments;
pub mod health;
pub mod posts;
pub mod users;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use postboard::{Access, Owned};

use crate::{config::Config, error::AppError, storage::Storage, token::TokenIssuer};

/// Shared application state threaded through all Axum handlers via [`axum::extract::State`].
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub config: Arc<Config>,
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, config: Config) -> Self {
        let tokens = TokenIssuer::new(&config.jwt_secret, config.jwt_ttl_hours);
        Self {
            storage,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
        }
    }
}

/// Parse a numeric path id; `kind` names the resource in the error message.
pub(crate) fn parse_id(raw: &str, kind: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {kind} ID")))
}

/// Unwrap a JSON body, turning extractor rejections into 400s.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(v)| v).map_err(AppError::from)
}

/// Refuse `action` unless `user_id` owns `row`.
pub(crate) fn ensure_owner<T: Owned>(
    row: &T,
    user_id: i64,
    action: &str,
    kind: &str,
) -> Result<(), AppError> {
    match row.access_for(user_id) {
        Access::Owner => Ok(()),
        Access::NotOwner => Err(AppError::Forbidden(format!(
            "You are not authorized to {action} this {kind}"
        ))),
        Access::Unowned => Err(AppError::Forbidden(format!(
            "anonymous {kind}s cannot be modified"
        ))),
    }
}

#[cfg(test)]
pub(crate) use testing::test_state;
