//! Assembles the Axum [`Router`] from all handler modules.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::{
    config::Config,
    handlers::{auth, comments, health, posts, users, AppState},
    middleware::logging::log_requests,
    storage::Storage,
};

/// Build the complete application router with shared state.
pub fn build_router(storage: Arc<dyn Storage>, config: Config) -> Router {
    build_router_with_state(AppState::new(storage, config))
}

/// Build the router around an existing [`AppState`].
pub fn build_router_with_state(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health::health))
        // Accounts
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/users/me", get(users::me))
        // Anonymous writes
        .route("/api/public/posts", post(posts::create_public))
        .route("/api/public/comments", post(comments::create_public))
        // Posts
        .route("/api/posts", get(posts::list).post(posts::create))
        .route(
            "/api/posts/{id}",
            get(posts::get_by_id).put(posts::update).delete(posts::delete),
        )
        .route(
            "/api/posts/{id}/comments",
            get(comments::list).post(comments::create_for_post),
        )
        // Comments
        .route("/api/comments", post(comments::create))
        .route(
            "/api/comments/{id}",
            put(comments::update).delete(comments::delete),
        )
        .with_state(state)
        .layer(axum::middleware::from_fn(log_requests))
        .layer(cors)
}

/// An empty allow-list means any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let list: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %o, "ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(list)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
