//! Core domain entities for Postboard.
//!
//! These mirror the persisted rows: [`User`], [`Post`], and [`Comment`].
//! Wire-format views (with rendered HTML and without secrets) live in the
//! `postboard-api` crate; these types are what the storage layer returns.

use chrono::{DateTime, SubsecRound, Utc};

/// A registered account.
///
/// `password_hash` is an Argon2 PHC string and must never be serialised to
/// clients; the API layer exposes a separate view without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A blog post.
///
/// `user_id` is `None` for anonymous posts created through the public
/// endpoint. `author` is a free-text display name and is independent of
/// `user_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
    pub user_id: Option<i64>,
    pub author: Option<String>,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker. Rows with a value here are invisible to reads.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A comment attached to a [`Post`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: Option<i64>,
    pub author: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Outcome of checking whether a user may mutate a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The row's `user_id` equals the caller.
    Owner,
    /// The row belongs to a different user.
    NotOwner,
    /// The row has no owning user (anonymous content). Nobody may mutate it.
    Unowned,
}

/// Anything with an optional owning user.
pub trait Owned {
    fn owner(&self) -> Option<i64>;

    /// Classify `user_id`'s rights over this row.
    fn access_for(&self, user_id: i64) -> Access {
        match self.owner() {
            Some(owner) if owner == user_id => Access::Owner,
            Some(_) => Access::NotOwner,
            None => Access::Unowned,
        }
    }
}

impl Owned for Post {
    fn owner(&self) -> Option<i64> {
        self.user_id
    }
}

impl Owned for Comment {
    fn owner(&self) -> Option<i64> {
        self.user_id
    }
}

/// Current time truncated to microsecond precision.
///
/// Stored timestamps round-trip through RFC 3339 text with six fractional
/// digits, so entities built in memory use the same precision.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(user_id: Option<i64>) -> Post {
        let ts = now();
        Post {
            id: 1,
            user_id,
            author: None,
            title: "t".into(),
            content: "c".into(),
            created_at: ts,
            updated_at: ts,
            deleted_at: None,
        }
    }

    #[test]
    fn owner_is_recognised() {
        assert_eq!(post(Some(7)).access_for(7), Access::Owner);
    }

    #[test]
    fn other_user_is_not_owner() {
        assert_eq!(post(Some(7)).access_for(8), Access::NotOwner);
    }

    #[test]
    fn anonymous_rows_are_unowned() {
        assert_eq!(post(None).access_for(7), Access::Unowned);
    }

    #[test]
    fn now_has_microsecond_precision() {
        let ts = now();
        assert_eq!(ts.timestamp_subsec_nanos() % 1_000, 0);
    }
}
