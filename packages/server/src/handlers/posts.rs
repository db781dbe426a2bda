//! Post handlers — create, list, get, update, delete.
//!
//! # Ownership
//!
//! Update and delete require a bearer token whose user id matches the post's
//! `user_id`. The checks run in a fixed order: id format (400), existence
//! (404), ownership (403), and only then the request body (400). Anonymous
//! posts have no owner and are never mutable.
//!
//! # Decoration
//!
//! Every read renders `html_content` on the fly. Reads also embed the post's
//! non-deleted comments, oldest first; write responses do not.

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use postboard::{validate_post, validation::validate_title, Post};
use postboard_api::{
    CommentView, CreatePostRequest, MessageResponse, PageQuery, Pagination, PostListResponse,
    PostView, UpdatePostRequest,
};

use crate::{
    error::AppError,
    middleware::auth::RequireAuth,
    storage::NewPost,
};

use super::{ensure_owner, json_body, parse_id, AppState};

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// `POST /api/posts`: create a post owned by the caller.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    body: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PostView>), AppError> {
    insert(&state, Some(caller.user_id), json_body(body)?).await
}

/// `POST /api/public/posts`: create an anonymous post.
pub async fn create_public(
    State(state): State<AppState>,
    body: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PostView>), AppError> {
    insert(&state, None, json_body(body)?).await
}

async fn insert(
    state: &AppState,
    user_id: Option<i64>,
    req: CreatePostRequest,
) -> Result<(StatusCode, Json<PostView>), AppError> {
    let author = req.author.filter(|a| !a.trim().is_empty());
    validate_post(&req.title, &req.content, author.as_deref())?;

    let post = state
        .storage
        .create_post(&NewPost {
            user_id,
            author,
            title: req.title,
            content: req.content,
        })
        .await?;
    tracing::info!(post_id = post.id, user_id = ?post.user_id, "post created");

    Ok((StatusCode::CREATED, Json(PostView::render(post, None))))
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// `GET /api/posts`: newest first, each with its comments.
///
/// Malformed paging parameters fall back to the defaults.
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<PostListResponse>, AppError> {
    let page = query
        .map(|Query(q)| q.to_request())
        .unwrap_or_default();

    let (posts, total) = state.storage.list_posts(page).await?;
    let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();

    let mut by_post: HashMap<i64, Vec<CommentView>> = HashMap::new();
    for comment in state.storage.comments_for_posts(&ids).await? {
        by_post
            .entry(comment.post_id)
            .or_default()
            .push(CommentView::from(comment));
    }

    let posts = posts
        .into_iter()
        .map(|post| {
            let comments = by_post.remove(&post.id).unwrap_or_default();
            PostView::render(post, Some(comments))
        })
        .collect();

    Ok(Json(PostListResponse {
        posts,
        pagination: Pagination::new(page, total),
    }))
}

/// `GET /api/posts/{id}`: a single post with its comments.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<PostView>, AppError> {
    let post = load(&state, &raw_id).await?;
    let comments = state
        .storage
        .comments_for_posts(&[post.id])
        .await?
        .into_iter()
        .map(CommentView::from)
        .collect();
    Ok(Json(PostView::render(post, Some(comments))))
}

// ---------------------------------------------------------------------------
// Update / delete
// ---------------------------------------------------------------------------

/// `PUT /api/posts/{id}`: partial update; empty fields are ignored.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> Result<Json<PostView>, AppError> {
    let mut post = load(&state, &raw_id).await?;
    ensure_owner(&post, caller.user_id, "update", "post")?;

    let req = json_body(body)?;
    if let Some(title) = req.title() {
        validate_title(title)?;
        post.title = title.to_string();
    }
    if let Some(content) = req.content() {
        post.content = content.to_string();
    }

    let post = state.storage.update_post(&post).await?;
    tracing::info!(post_id = post.id, "post updated");
    Ok(Json(PostView::render(post, None)))
}

/// `DELETE /api/posts/{id}`: soft delete. Comments are left in place.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let post = load(&state, &raw_id).await?;
    ensure_owner(&post, caller.user_id, "delete", "post")?;

    state.storage.delete_post(post.id).await?;
    tracing::info!(post_id = post.id, "post deleted");
    Ok(Json(MessageResponse::new("Post deleted")))
}

async fn load(state: &AppState, raw_id: &str) -> Result<Post, AppError> {
    let id = parse_id(raw_id, "post")?;
    state
        .storage
        .get_post(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
