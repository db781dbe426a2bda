//! Storage abstraction layer for the Postboard server.
//!
//! The [`Storage`] trait defines the contract between the HTTP handler layer
//! and persistence. Ownership and validation logic lives in the handlers;
//! storage is purely a data access layer. Every read excludes soft-deleted
//! rows.
//!
//! The only implementation is [`SqliteStorage`], which is also used with an
//! in-memory database by the tests.
//!
//! [`SqliteStorage`]: sqlite::SqliteStorage

pub mod sqlite;

use async_trait::async_trait;
use postboard::{Comment, PageRequest, Post, User};

// ---------------------------------------------------------------------------
// StorageError
// ---------------------------------------------------------------------------

/// Errors that storage operations can return.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested row does not exist or has been soft-deleted.
    #[error("not found")]
    NotFound,

    /// A new row names an owning user that does not exist.
    #[error("unknown user {0}")]
    UnknownUser(i64),

    /// A uniqueness constraint was violated (e.g. duplicate username).
    #[error("conflict: {0}")]
    Conflict(String),

    /// An unexpected error in the underlying storage backend.
    #[error("internal storage error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// Insert payloads
// ---------------------------------------------------------------------------

/// Fields supplied when creating a post. Ids and timestamps are assigned by
/// storage.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub user_id: Option<i64>,
    pub author: Option<String>,
    pub title: String,
    pub content: String,
}

/// Fields supplied when creating a comment.
#[derive(Debug, Clone, Default)]
pub struct NewComment {
    pub post_id: i64,
    pub user_id: Option<i64>,
    pub author: Option<String>,
    pub content: String,
}

// ---------------------------------------------------------------------------
// Storage trait
// ---------------------------------------------------------------------------

/// The persistence contract for a Postboard server.
///
/// All methods are `async` and return `Result<_, StorageError>`.
/// Implementations must be `Send + Sync + 'static` so they can be held in an
/// `Arc<dyn Storage>`.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    // --- Users ---------------------------------------------------------------

    /// Insert a user. Returns [`StorageError::Conflict`] if the username is
    /// taken.
    async fn create_user(&self, username: &str, password_hash: &str)
        -> Result<User, StorageError>;

    async fn find_user(&self, id: i64) -> Result<Option<User>, StorageError>;

    async fn find_user_by_username(&self, username: &str)
        -> Result<Option<User>, StorageError>;

    // --- Posts ---------------------------------------------------------------

    async fn create_post(&self, post: &NewPost) -> Result<Post, StorageError>;

    /// Retrieve a non-deleted post by id. Returns `None` if absent.
    async fn get_post(&self, id: i64) -> Result<Option<Post>, StorageError>;

    /// Return one page of non-deleted posts, newest first, together with the
    /// total number of non-deleted posts.
    async fn list_posts(&self, page: PageRequest) -> Result<(Vec<Post>, u64), StorageError>;

    /// Persist `title` and `content` of an existing post and refresh
    /// `updated_at`. Returns the stored row.
    async fn update_post(&self, post: &Post) -> Result<Post, StorageError>;

    /// Set the soft-delete marker. [`StorageError::NotFound`] if the post is
    /// absent or already deleted.
    async fn delete_post(&self, id: i64) -> Result<(), StorageError>;

    // --- Comments ------------------------------------------------------------

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, StorageError>;

    async fn get_comment(&self, id: i64) -> Result<Option<Comment>, StorageError>;

    /// Return one page of a post's non-deleted comments, oldest first, with the
    /// total count for that post.
    async fn list_comments(
        &self,
        post_id: i64,
        page: PageRequest,
    ) -> Result<(Vec<Comment>, u64), StorageError>;

    /// All non-deleted comments belonging to any of `post_ids`, oldest first.
    async fn comments_for_posts(&self, post_ids: &[i64]) -> Result<Vec<Comment>, StorageError>;

    /// Persist `content` of an existing comment and refresh `updated_at`.
    async fn update_comment(&self, comment: &Comment) -> Result<Comment, StorageError>;

    async fn delete_comment(&self, id: i64) -> Result<(), StorageError>;
}
