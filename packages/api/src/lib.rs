//! Request and response types for the Postboard HTTP API.
//!
//! Every JSON body the server reads or writes is defined here, so that the
//! server, the conformance suite, and any Rust client agree on one contract.
//!
//! # Endpoints covered
//!
//! | Method | Path | Type |
//! |--------|------|------|
//! | POST | `/api/auth/register` | [`RegisterRequest`] → [`UserResponse`] |
//! | POST | `/api/auth/login` | [`LoginRequest`] → [`TokenResponse`] |
//! | GET | `/api/users/me` | → [`UserResponse`] |
//! | POST | `/api/posts`, `/api/public/posts` | [`CreatePostRequest`] → [`PostView`] |
//! | GET | `/api/posts` | [`PageQuery`] → [`PostListResponse`] |
//! | GET | `/api/posts/{id}` | → [`PostView`] |
//! | PUT | `/api/posts/{id}` | [`UpdatePostRequest`] → [`PostView`] |
//! | DELETE | `/api/posts/{id}` | → [`MessageResponse`] |
//! | GET | `/api/posts/{id}/comments` | [`PageQuery`] → [`CommentListResponse`] |
//! | POST | `/api/posts/{id}/comments`, `/api/comments`, `/api/public/comments` | [`CreateCommentRequest`] → [`CommentView`] |
//! | PUT | `/api/comments/{id}` | [`UpdateCommentRequest`] → [`CommentView`] |
//! | DELETE | `/api/comments/{id}` | → [`MessageResponse`] |
//! | GET | `/health` | → [`HealthResponse`] |
//!
//! Every error is an [`ErrorResponse`].

pub mod auth;
pub mod comment;
pub mod error;
pub mod health;
pub mod page;
pub mod post;

pub use auth::{LoginRequest, RegisterRequest, TokenResponse, UserResponse};
pub use comment::{CommentListResponse, CommentView, CreateCommentRequest, UpdateCommentRequest};
pub use error::{ErrorResponse, MessageResponse};
pub use health::HealthResponse;
pub use page::{PageQuery, Pagination};
pub use post::{CreatePostRequest, PostListResponse, PostView, UpdatePostRequest};
