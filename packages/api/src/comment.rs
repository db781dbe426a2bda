//! Comment types — `/api/comments`, `/api/posts/{id}/comments`,
//! `/api/public/comments`.

use chrono::{DateTime, Utc};
use postboard::{render_markdown, Comment};
use serde::{Deserialize, Serialize};

use crate::page::Pagination;

/// Request body for comment creation.
///
/// On `POST /api/posts/{id}/comments` the path id wins and `post_id` is
/// ignored; on `POST /api/comments` and `POST /api/public/comments` it is
/// required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateCommentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<i64>,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Request body for `PUT /api/comments/{id}`. `content` is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateCommentRequest {
    #[serde(default)]
    pub content: String,
}

/// A comment as returned to clients, with its markdown rendered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentView {
    pub id: i64,
    pub post_id: i64,
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub content: String,
    pub html_content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        let html_content = render_markdown(&comment.content);
        Self {
            id: comment.id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            author: comment.author,
            content: comment.content,
            html_content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

/// Response body for `GET /api/posts/{id}/comments`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentListResponse {
    pub comments: Vec<CommentView>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_renders_markdown() {
        let now = Utc::now();
        let view = CommentView::from(Comment {
            id: 1,
            post_id: 2,
            user_id: Some(5),
            author: None,
            content: "nice *post*".into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        });
        assert_eq!(view.html_content, "<p>nice <em>post</em></p>\n");
        assert_eq!(view.user_id, Some(5));
    }

    #[test]
    fn create_request_post_id_optional() {
        let req: CreateCommentRequest = serde_json::from_str(r#"{"content":"x"}"#).unwrap();
        assert_eq!(req.post_id, None);
        let req: CreateCommentRequest =
            serde_json::from_str(r#"{"post_id":4,"content":"x","author":"bob"}"#).unwrap();
        assert_eq!(req.post_id, Some(4));
        assert_eq!(req.author.as_deref(), Some("bob"));
    }
}
