//! Comment handlers.
//!
//! Three creation routes share one code path: `POST /api/posts/{id}/comments`
//! takes the post from the URL, `POST /api/comments` and
//! `POST /api/public/comments` take it from the body's `post_id`. Ownership
//! rules match those for posts.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use postboard::{validate_comment, validation::validate_content, Comment};
use postboard_api::{
    CommentListResponse, CommentView, CreateCommentRequest, MessageResponse, PageQuery,
    Pagination, UpdateCommentRequest,
};

use crate::{
    error::AppError,
    middleware::auth::RequireAuth,
    storage::{NewComment, StorageError},
};

use super::{ensure_owner, json_body, parse_id, AppState};

/// `POST /api/posts/{id}/comments`: authenticated; the path id wins over
/// any `post_id` in the body.
pub async fn create_for_post(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(raw_id): Path<String>,
    body: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CommentView>), AppError> {
    let post_id = parse_id(&raw_id, "post")?;
    insert(&state, Some(caller.user_id), Some(post_id), json_body(body)?).await
}

/// `POST /api/comments`: authenticated; `post_id` from the body.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    body: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CommentView>), AppError> {
    let req = json_body(body)?;
    insert(&state, Some(caller.user_id), req.post_id, req).await
}

/// `POST /api/public/comments`: anonymous.
pub async fn create_public(
    State(state): State<AppState>,
    body: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CommentView>), AppError> {
    let req = json_body(body)?;
    insert(&state, None, req.post_id, req).await
}

async fn insert(
    state: &AppState,
    user_id: Option<i64>,
    post_id: Option<i64>,
    req: CreateCommentRequest,
) -> Result<(StatusCode, Json<CommentView>), AppError> {
    let post_id = post_id
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest("Post ID is required".into()))?;
    if state.storage.get_post(post_id).await?.is_none() {
        return Err(post_not_found());
    }

    let author = req.author.filter(|a| !a.trim().is_empty());
    validate_comment(&req.content, author.as_deref())?;

    let comment = state
        .storage
        .create_comment(&NewComment {
            post_id,
            user_id,
            author,
            content: req.content,
        })
        .await
        .map_err(|e| match e {
            // The post was deleted between the check and the insert.
            StorageError::NotFound => post_not_found(),
            other => other.into(),
        })?;
    tracing::info!(comment_id = comment.id, post_id, user_id = ?user_id, "comment created");

    Ok((StatusCode::CREATED, Json(comment.into())))
}

/// `GET /api/posts/{id}/comments`: oldest first. An unknown post yields an
/// empty page.
pub async fn list(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<CommentListResponse>, AppError> {
    let post_id = parse_id(&raw_id, "post")?;
    let page = query
        .map(|Query(q)| q.to_request())
        .unwrap_or_default();

    let (comments, total) = state.storage.list_comments(post_id, page).await?;
    Ok(Json(CommentListResponse {
        comments: comments.into_iter().map(CommentView::from).collect(),
        pagination: Pagination::new(page, total),
    }))
}

/// `PUT /api/comments/{id}`: replace the content.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdateCommentRequest>, JsonRejection>,
) -> Result<Json<CommentView>, AppError> {
    let mut comment = load(&state, &raw_id).await?;
    ensure_owner(&comment, caller.user_id, "update", "comment")?;

    let req = json_body(body)?;
    validate_content(&req.content)?;
    comment.content = req.content;

    let comment = state.storage.update_comment(&comment).await?;
    tracing::info!(comment_id = comment.id, "comment updated");
    Ok(Json(comment.into()))
}

/// `DELETE /api/comments/{id}`: soft delete.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let comment = load(&state, &raw_id).await?;
    ensure_owner(&comment, caller.user_id, "delete", "comment")?;

    state.storage.delete_comment(comment.id).await?;
    tracing::info!(comment_id = comment.id, "comment deleted");
    Ok(Json(MessageResponse::new("Comment deleted")))
}

async fn load(state: &AppState, raw_id: &str) -> Result<Comment, AppError> {
    let id = parse_id(raw_id, "comment")?;
    state
        .storage
        .get_comment(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".into()))
}

fn post_not_found() -> AppError {
    AppError::NotFound("Post not found".into())
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use axum::Router;
    use serde_json::json;

    use crate::handlers::testing::{login_as, send, test_app};

    async fn seed_post(app: &Router, token: &str) {
        let (status, _) = send(
            app,
            Method::POST,
            "/api/posts",
            Some(token),
            Some(json!({ "title": "Hi", "content": "World" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn create_via_path_and_body() {
        let app = test_app();
        let token = login_as(&app, "alice").await;
        seed_post(&app, &token).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/posts/1/comments",
            Some(&token),
            Some(json!({ "post_id": 99, "content": "via path" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["post_id"], 1);
        assert_eq!(body["user_id"], 1);
        assert_eq!(body["html_content"], "<p>via path</p>\n");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/comments",
            Some(&token),
            Some(json!({ "post_id": 1, "content": "via body" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["post_id"], 1);
    }

    #[tokio::test]
    async fn missing_post_id_is_400() {
        let app = test_app();
        let token = login_as(&app, "alice").await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/comments",
            Some(&token),
            Some(json!({ "content": "orphan" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Post ID is required");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/public/comments",
            None,
            Some(json!({ "content": "orphan" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn comment_on_missing_post_is_404() {
        let app = test_app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/public/comments",
            None,
            Some(json!({ "post_id": 7, "content": "hello?" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Post not found");
    }

    #[tokio::test]
    async fn empty_content_is_400() {
        let app = test_app();
        let token = login_as(&app, "alice").await;
        seed_post(&app, &token).await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/posts/1/comments",
            Some(&token),
            Some(json!({ "content": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "content is required");
    }

    #[tokio::test]
    async fn list_is_oldest_first_and_paginated() {
        let app = test_app();
        let token = login_as(&app, "alice").await;
        seed_post(&app, &token).await;
        for c in ["a", "b", "c"] {
            send(
                &app,
                Method::POST,
                "/api/public/comments",
                None,
                Some(json!({ "post_id": 1, "content": c })),
            )
            .await;
        }

        let (status, body) =
            send(&app, Method::GET, "/api/posts/1/comments?page_size=2", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["comments"][0]["content"], "a");
        assert_eq!(body["comments"][1]["content"], "b");
        assert_eq!(
            body["pagination"],
            json!({ "page": 1, "page_size": 2, "total": 3, "total_pages": 2 })
        );

        let (_, body) =
            send(&app, Method::GET, "/api/posts/1/comments?page=2&page_size=2", None, None).await;
        assert_eq!(body["comments"][0]["content"], "c");
    }

    #[tokio::test]
    async fn list_for_unknown_post_is_empty() {
        let app = test_app();
        let (status, body) = send(&app, Method::GET, "/api/posts/42/comments", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["comments"], json!([]));
        assert_eq!(body["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn owner_can_update_and_delete() {
        let app = test_app();
        let token = login_as(&app, "alice").await;
        seed_post(&app, &token).await;
        send(
            &app,
            Method::POST,
            "/api/posts/1/comments",
            Some(&token),
            Some(json!({ "content": "draft" })),
        )
        .await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/comments/1",
            Some(&token),
            Some(json!({ "content": "final" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "final");

        let (status, body) = send(&app, Method::DELETE, "/api/comments/1", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Comment deleted");

        let (status, _) = send(&app, Method::DELETE, "/api/comments/1", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_owner_and_anonymous_are_forbidden() {
        let app = test_app();
        let alice = login_as(&app, "alice").await;
        let bob = login_as(&app, "bob").await;
        seed_post(&app, &alice).await;
        send(
            &app,
            Method::POST,
            "/api/posts/1/comments",
            Some(&alice),
            Some(json!({ "content": "alice's" })),
        )
        .await;
        send(
            &app,
            Method::POST,
            "/api/public/comments",
            None,
            Some(json!({ "post_id": 1, "content": "anon" })),
        )
        .await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/comments/1",
            Some(&bob),
            Some(json!({ "content": "hijack" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "You are not authorized to update this comment");

        let (status, body) = send(&app, Method::DELETE, "/api/comments/2", Some(&alice), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "anonymous comments cannot be modified");
    }

    #[tokio::test]
    async fn bad_comment_id_is_400() {
        let app = test_app();
        let token = login_as(&app, "alice").await;
        let (status, body) = send(&app, Method::DELETE, "/api/comments/x1", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid comment ID");
    }

    #[tokio::test]
    async fn comments_of_deleted_post_survive_but_new_ones_are_refused() {
        let app = test_app();
        let token = login_as(&app, "alice").await;
        seed_post(&app, &token).await;
        send(
            &app,
            Method::POST,
            "/api/posts/1/comments",
            Some(&token),
            Some(json!({ "content": "kept" })),
        )
        .await;
        send(&app, Method::DELETE, "/api/posts/1", Some(&token), None).await;

        let (_, body) = send(&app, Method::GET, "/api/posts/1/comments", None, None).await;
        assert_eq!(body["pagination"]["total"], 1);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/posts/1/comments",
            Some(&token),
            Some(json!({ "content": "late" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
