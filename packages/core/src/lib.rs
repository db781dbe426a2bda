//! Domain library for Postboard, a posts/comments service.
//!
//! This crate holds everything that does not depend on HTTP or a database:
//! the entity types, input validation, the pagination policy, and markdown
//! rendering. The `postboard-api` crate builds wire types on top of it and
//! `postboard-server` ties both to axum and SQLite.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`types`] | Entities: [`User`], [`Post`], [`Comment`], and the [`Owned`] access check |
//! | [`validation`] | Input checks via [`validate_post`], [`validate_comment`], [`validate_credentials`] |
//! | [`pagination`] | [`PageRequest`]: defaults, clamping, offset and page-count arithmetic |
//! | [`render`] | [`render_markdown`] |

pub mod pagination;
pub mod render;
pub mod types;
pub mod validation;

pub use pagination::PageRequest;
pub use render::render_markdown;
pub use types::{Access, Comment, Owned, Post, User};
pub use validation::{validate_comment, validate_credentials, validate_post, ValidationError};
