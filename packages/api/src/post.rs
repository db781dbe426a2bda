//! Post types — `/api/posts` and `/api/public/posts`.

use chrono::{DateTime, Utc};
use postboard::{render_markdown, Post};
use serde::{Deserialize, Serialize};

use crate::comment::CommentView;
use crate::page::Pagination;

/// Request body for `POST /api/posts` and `POST /api/public/posts`.
///
/// Missing `title`/`content` deserialise as empty strings so that they are
/// reported by validation ("title is required") rather than as a JSON error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Request body for `PUT /api/posts/{id}`.
///
/// Partial update: a field that is absent or empty leaves the stored value
/// unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl UpdatePostRequest {
    /// The new title, if one was supplied and is non-empty.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// The new content, if supplied and non-empty.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }
}

/// A post as returned to clients, with its markdown rendered.
///
/// `comments` is present on reads (`GET /api/posts`, `GET /api/posts/{id}`)
/// and absent on write responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostView {
    pub id: i64,
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub title: String,
    pub content: String,
    pub html_content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentView>>,
}

impl PostView {
    /// Decorate a post with freshly rendered HTML.
    pub fn render(post: Post, comments: Option<Vec<CommentView>>) -> Self {
        let html_content = render_markdown(&post.content);
        Self {
            id: post.id,
            user_id: post.user_id,
            author: post.author,
            title: post.title,
            content: post.content,
            html_content,
            created_at: post.created_at,
            updated_at: post.updated_at,
            comments,
        }
    }
}

/// Response body for `GET /api/posts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostListResponse {
    pub posts: Vec<PostView>,
    pub pagination: Pagination,
}
