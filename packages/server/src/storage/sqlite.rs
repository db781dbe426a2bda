//! SQLite-backed storage implementation.
//!
//! Uses `rusqlite` (with bundled SQLite) behind an `r2d2` connection pool to
//! satisfy the `Send + Sync` requirements. All blocking calls are offloaded
//! to a thread-pool via `tokio::task::spawn_blocking`.
//!
//! # Schema
//!
//! - `users` — accounts; `username` is unique.
//! - `posts` — posts with an optional owning user and a soft-delete marker.
//! - `comments` — comments keyed to a post, also soft-deletable.
//!
//! Timestamps are stored as RFC 3339 text with microsecond precision and a
//! `Z` suffix, so lexical order matches chronological order.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use postboard::{types::now, Comment, PageRequest, Post, User};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::{NewComment, NewPost, Storage, StorageError};
use crate::config::DatabaseConfig;

pub type DbPool = Pool<SqliteConnectionManager>;

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS posts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER REFERENCES users(id),
    author      TEXT,
    title       TEXT NOT NULL,
    content     TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    deleted_at  TEXT
);
CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at);
CREATE INDEX IF NOT EXISTS idx_posts_deleted_at ON posts(deleted_at);

CREATE TABLE IF NOT EXISTS comments (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id     INTEGER NOT NULL REFERENCES posts(id),
    user_id     INTEGER REFERENCES users(id),
    author      TEXT,
    content     TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    deleted_at  TEXT
);
CREATE INDEX IF NOT EXISTS idx_comments_post_id    ON comments(post_id);
CREATE INDEX IF NOT EXISTS idx_comments_deleted_at ON comments(deleted_at);
";

/// Applied to every pooled connection when it is opened.
const CONNECTION_PRAGMAS: &str = "
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;
";

const POST_COLUMNS: &str =
    "id, user_id, author, title, content, created_at, updated_at, deleted_at";
const COMMENT_COLUMNS: &str =
    "id, post_id, user_id, author, content, created_at, updated_at, deleted_at";

// ---------------------------------------------------------------------------
// SqliteStorage
// ---------------------------------------------------------------------------

/// SQLite-backed implementation of [`Storage`].
pub struct SqliteStorage {
    pool: DbPool,
}

impl SqliteStorage {
    /// Open (or create) the database described by `db` and apply the schema.
    ///
    /// A `:memory:` name is routed to [`SqliteStorage::open_in_memory`].
    pub fn open(db: &DatabaseConfig) -> Result<Self, StorageError> {
        let Some(path) = db.path() else {
            return Self::open_in_memory();
        };

        let manager = SqliteConnectionManager::file(path)
            .with_init(|c| c.execute_batch(CONNECTION_PRAGMAS));
        let pool = Pool::builder()
            .max_size(db.pool_size)
            .connection_timeout(Duration::from_secs(10))
            .build(manager)
            .map_err(map_pool_err)?;

        let conn = pool.get().map_err(map_pool_err)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(map_err)?;
        conn.execute_batch(SCHEMA).map_err(map_err)?;

        Ok(Self { pool })
    }

    /// Open an in-memory SQLite database (data is lost when dropped).
    ///
    /// Every in-memory connection is its own database, so the pool holds
    /// exactly one connection and never recycles it.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let manager =
            SqliteConnectionManager::memory().with_init(|c| c.execute_batch(CONNECTION_PRAGMAS));
        let pool = Pool::builder()
            .max_size(1)
            .min_idle(Some(1))
            .idle_timeout(None)
            .max_lifetime(None)
            .build(manager)
            .map_err(map_pool_err)?;

        pool.get()
            .map_err(map_pool_err)?
            .execute_batch(SCHEMA)
            .map_err(map_err)?;

        Ok(Self { pool })
    }

    /// Run `f` against a pooled connection on the blocking thread-pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn: PooledConnection<SqliteConnectionManager> =
                pool.get().map_err(map_pool_err)?;
            f(&conn)
        })
        .await
        .map_err(|e| StorageError::Internal(format!("task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// Error conversions
// ---------------------------------------------------------------------------

fn map_err(e: rusqlite::Error) -> StorageError {
    if let rusqlite::Error::SqliteFailure(err, msg) = &e {
        match err.extended_code {
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => {
                return StorageError::Conflict(msg.clone().unwrap_or_else(|| err.to_string()));
            }
            rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => return StorageError::NotFound,
            _ => {}
        }
    }
    StorageError::Internal(e.to_string())
}

/// Rows may only name a user that still exists.
fn ensure_user(conn: &Connection, user_id: Option<i64>) -> Result<(), StorageError> {
    let Some(id) = user_id else {
        return Ok(());
    };
    let exists: i64 = conn
        .query_row("SELECT COUNT(*) FROM users WHERE id = ?1", params![id], |row| {
            row.get(0)
        })
        .map_err(map_err)?;
    if exists == 0 {
        return Err(StorageError::UnknownUser(id));
    }
    Ok(())
}

fn map_pool_err(e: r2d2::Error) -> StorageError {
    StorageError::Internal(format!("connection pool: {e}"))
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn ts_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_ts(idx, &raw)
}

fn opt_ts_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| parse_ts(idx, &s)).transpose()
}

fn parse_ts(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: ts_at(row, 3)?,
        updated_at: ts_at(row, 4)?,
    })
}

fn row_to_post(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        user_id: row.get(1)?,
        author: row.get(2)?,
        title: row.get(3)?,
        content: row.get(4)?,
        created_at: ts_at(row, 5)?,
        updated_at: ts_at(row, 6)?,
        deleted_at: opt_ts_at(row, 7)?,
    })
}

fn row_to_comment(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        post_id: row.get(1)?,
        user_id: row.get(2)?,
        author: row.get(3)?,
        content: row.get(4)?,
        created_at: ts_at(row, 5)?,
        updated_at: ts_at(row, 6)?,
        deleted_at: opt_ts_at(row, 7)?,
    })
}

/// `u64` page arithmetic to SQLite's signed integers.
fn to_sql_int(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

// ---------------------------------------------------------------------------
// Storage impl
// ---------------------------------------------------------------------------

#[async_trait]
impl Storage for SqliteStorage {
    // --- Users ---------------------------------------------------------------

    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<User, StorageError> {
        let username = username.to_string();
        let password_hash = password_hash.to_string();

        self.with_conn(move |conn| {
            let created = now();
            let ts = format_ts(&created);
            conn.execute(
                "INSERT INTO users (username, password_hash, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)",
                params![username, password_hash, ts],
            )
            .map_err(|e| match map_err(e) {
                StorageError::Conflict(_) => {
                    StorageError::Conflict(format!("username {username:?} is already taken"))
                }
                other => other,
            })?;

            Ok(User {
                id: conn.last_insert_rowid(),
                username,
                password_hash,
                created_at: created,
                updated_at: created,
            })
        })
        .await
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StorageError> {
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT id, username, password_hash, created_at, updated_at
                 FROM users WHERE id = ?1",
                params![id],
                row_to_user,
            )
            .optional()
            .map_err(map_err)
        })
        .await
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, StorageError> {
        let username = username.to_string();
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT id, username, password_hash, created_at, updated_at
                 FROM users WHERE username = ?1",
                params![username],
                row_to_user,
            )
            .optional()
            .map_err(map_err)
        })
        .await
    }

    // --- Posts ---------------------------------------------------------------

    async fn create_post(&self, post: &NewPost) -> Result<Post, StorageError> {
        let new = post.clone();

        self.with_conn(move |conn| {
            ensure_user(conn, new.user_id)?;
            let created = now();
            conn.execute(
                "INSERT INTO posts (user_id, author, title, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![new.user_id, new.author, new.title, new.content, format_ts(&created)],
            )
            .map_err(map_err)?;

            Ok(Post {
                id: conn.last_insert_rowid(),
                user_id: new.user_id,
                author: new.author,
                title: new.title,
                content: new.content,
                created_at: created,
                updated_at: created,
                deleted_at: None,
            })
        })
        .await
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, StorageError> {
        self.with_conn(move |conn| {
            conn.query_row(
                &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1 AND deleted_at IS NULL"),
                params![id],
                row_to_post,
            )
            .optional()
            .map_err(map_err)
        })
        .await
    }

    async fn list_posts(&self, page: PageRequest) -> Result<(Vec<Post>, u64), StorageError> {
        self.with_conn(move |conn| {
            let total: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM posts WHERE deleted_at IS NULL",
                    [],
                    |row| row.get(0),
                )
                .map_err(map_err)?;

            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {POST_COLUMNS} FROM posts
                     WHERE deleted_at IS NULL
                     ORDER BY created_at DESC, id DESC
                     LIMIT ?1 OFFSET ?2"
                ))
                .map_err(map_err)?;
            let posts = stmt
                .query_map(
                    params![to_sql_int(page.limit()), to_sql_int(page.offset())],
                    row_to_post,
                )
                .map_err(map_err)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(map_err)?;

            Ok((posts, total.max(0) as u64))
        })
        .await
    }

    async fn update_post(&self, post: &Post) -> Result<Post, StorageError> {
        let mut post = post.clone();

        self.with_conn(move |conn| {
            let updated = now();
            let n = conn
                .execute(
                    "UPDATE posts SET title = ?1, content = ?2, updated_at = ?3
                     WHERE id = ?4 AND deleted_at IS NULL",
                    params![post.title, post.content, format_ts(&updated), post.id],
                )
                .map_err(map_err)?;
            if n == 0 {
                return Err(StorageError::NotFound);
            }
            post.updated_at = updated;
            Ok(post)
        })
        .await
    }

    async fn delete_post(&self, id: i64) -> Result<(), StorageError> {
        self.with_conn(move |conn| {
            let n = conn
                .execute(
                    "UPDATE posts SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
                    params![format_ts(&now()), id],
                )
                .map_err(map_err)?;
            if n == 0 {
                return Err(StorageError::NotFound);
            }
            Ok(())
        })
        .await
    }

    // --- Comments ------------------------------------------------------------

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, StorageError> {
        let new = comment.clone();

        self.with_conn(move |conn| {
            let live: bool = conn
                .query_row(
                    "SELECT COUNT(*) FROM posts WHERE id = ?1 AND deleted_at IS NULL",
                    params![new.post_id],
                    |row| row.get::<_, i64>(0),
                )
                .map_err(map_err)?
                > 0;
            if !live {
                return Err(StorageError::NotFound);
            }
            ensure_user(conn, new.user_id)?;

            let created = now();
            conn.execute(
                "INSERT INTO comments (post_id, user_id, author, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![new.post_id, new.user_id, new.author, new.content, format_ts(&created)],
            )
            .map_err(map_err)?;

            Ok(Comment {
                id: conn.last_insert_rowid(),
                post_id: new.post_id,
                user_id: new.user_id,
                author: new.author,
                content: new.content,
                created_at: created,
                updated_at: created,
                deleted_at: None,
            })
        })
        .await
    }

    async fn get_comment(&self, id: i64) -> Result<Option<Comment>, StorageError> {
        self.with_conn(move |conn| {
            conn.query_row(
                &format!(
                    "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1 AND deleted_at IS NULL"
                ),
                params![id],
                row_to_comment,
            )
            .optional()
            .map_err(map_err)
        })
        .await
    }

    async fn list_comments(
        &self,
        post_id: i64,
        page: PageRequest,
    ) -> Result<(Vec<Comment>, u64), StorageError> {
        self.with_conn(move |conn| {
            let total: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM comments WHERE post_id = ?1 AND deleted_at IS NULL",
                    params![post_id],
                    |row| row.get(0),
                )
                .map_err(map_err)?;

            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {COMMENT_COLUMNS} FROM comments
                     WHERE post_id = ?1 AND deleted_at IS NULL
                     ORDER BY created_at ASC, id ASC
                     LIMIT ?2 OFFSET ?3"
                ))
                .map_err(map_err)?;
            let comments = stmt
                .query_map(
                    params![post_id, to_sql_int(page.limit()), to_sql_int(page.offset())],
                    row_to_comment,
                )
                .map_err(map_err)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(map_err)?;

            Ok((comments, total.max(0) as u64))
        })
        .await
    }

    async fn comments_for_posts(&self, post_ids: &[i64]) -> Result<Vec<Comment>, StorageError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = post_ids.to_vec();

        self.with_conn(move |conn| {
            let placeholders = vec!["?"; ids.len()].join(", ");
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {COMMENT_COLUMNS} FROM comments
                     WHERE post_id IN ({placeholders}) AND deleted_at IS NULL
                     ORDER BY created_at ASC, id ASC"
                ))
                .map_err(map_err)?;
            let comments = stmt
                .query_map(params_from_iter(ids.iter()), row_to_comment)
                .map_err(map_err)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(map_err)?;
            Ok(comments)
        })
        .await
    }

    async fn update_comment(&self, comment: &Comment) -> Result<Comment, StorageError> {
        let mut comment = comment.clone();

        self.with_conn(move |conn| {
            let updated = now();
            let n = conn
                .execute(
                    "UPDATE comments SET content = ?1, updated_at = ?2
                     WHERE id = ?3 AND deleted_at IS NULL",
                    params![comment.content, format_ts(&updated), comment.id],
                )
                .map_err(map_err)?;
            if n == 0 {
                return Err(StorageError::NotFound);
            }
            comment.updated_at = updated;
            Ok(comment)
        })
        .await
    }

    async fn delete_comment(&self, id: i64) -> Result<(), StorageError> {
        self.with_conn(move |conn| {
            let n = conn
                .execute(
                    "UPDATE comments SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
                    params![format_ts(&now()), id],
                )
                .map_err(map_err)?;
            if n == 0 {
                return Err(StorageError::NotFound);
            }
            Ok(())
        })
        .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> SqliteStorage {
        SqliteStorage::open_in_memory().unwrap()
    }

    fn new_post(title: &str, user_id: Option<i64>) -> NewPost {
        NewPost {
            user_id,
            author: None,
            title: title.into(),
            content: format!("{title} body"),
        }
    }

    fn new_comment(post_id: i64, content: &str) -> NewComment {
        NewComment {
            post_id,
            content: content.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_and_find_user() {
        let s = storage();
        let u = s.create_user("alice", "$argon2id$stub").await.unwrap();
        assert_eq!(u.id, 1);

        let by_id = s.find_user(u.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice");
        let by_name = s.find_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, u.id);
        assert!(s.find_user_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let s = storage();
        s.create_user("alice", "h").await.unwrap();
        let err = s.create_user("alice", "h2").await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
    }

    #[tokio::test]
    async fn post_roundtrip_preserves_fields() {
        let s = storage();
        let created = s
            .create_post(&NewPost {
                user_id: None,
                author: Some("guest".into()),
                title: "Hi".into(),
                content: "World".into(),
            })
            .await
            .unwrap();
        let got = s.get_post(created.id).await.unwrap().unwrap();
        assert_eq!(got, created);
        assert_eq!(got.author.as_deref(), Some("guest"));
    }

    #[tokio::test]
    async fn list_posts_newest_first_with_total() {
        let s = storage();
        for i in 1..=5 {
            s.create_post(&new_post(&format!("p{i}"), None)).await.unwrap();
        }
        let (page, total) = s.list_posts(PageRequest::new(Some(1), Some(2))).await.unwrap();
        assert_eq!(total, 5);
        let titles: Vec<_> = page.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["p5", "p4"]);

        let (last, _) = s.list_posts(PageRequest::new(Some(3), Some(2))).await.unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].title, "p1");
    }

    #[tokio::test]
    async fn soft_deleted_posts_disappear() {
        let s = storage();
        let p = s.create_post(&new_post("gone", None)).await.unwrap();
        s.create_post(&new_post("kept", None)).await.unwrap();

        s.delete_post(p.id).await.unwrap();
        assert!(s.get_post(p.id).await.unwrap().is_none());
        let (posts, total) = s.list_posts(PageRequest::default()).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(posts[0].title, "kept");

        assert!(matches!(s.delete_post(p.id).await, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn update_post_refreshes_updated_at() {
        let s = storage();
        let owner = s.create_user("alice", "h").await.unwrap();
        let mut p = s.create_post(&new_post("old", Some(owner.id))).await.unwrap();
        p.title = "new".into();
        let updated = s.update_post(&p).await.unwrap();
        assert!(updated.updated_at >= updated.created_at);

        let got = s.get_post(p.id).await.unwrap().unwrap();
        assert_eq!(got.title, "new");
        assert_eq!(got.content, "old body");
    }

    #[tokio::test]
    async fn rows_cannot_name_a_missing_user() {
        let s = storage();
        assert!(matches!(
            s.create_post(&new_post("ghost", Some(42))).await,
            Err(StorageError::UnknownUser(42))
        ));

        let p = s.create_post(&new_post("anon", None)).await.unwrap();
        let c = NewComment {
            user_id: Some(42),
            ..new_comment(p.id, "ghost")
        };
        assert!(matches!(
            s.create_comment(&c).await,
            Err(StorageError::UnknownUser(42))
        ));
    }

    #[tokio::test]
    async fn update_deleted_post_is_not_found() {
        let s = storage();
        let p = s.create_post(&new_post("x", None)).await.unwrap();
        s.delete_post(p.id).await.unwrap();
        assert!(matches!(s.update_post(&p).await, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn comment_requires_live_post() {
        let s = storage();
        assert!(matches!(
            s.create_comment(&new_comment(42, "hi")).await,
            Err(StorageError::NotFound)
        ));

        let p = s.create_post(&new_post("x", None)).await.unwrap();
        s.delete_post(p.id).await.unwrap();
        assert!(matches!(
            s.create_comment(&new_comment(p.id, "hi")).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn comments_oldest_first_and_scoped() {
        let s = storage();
        let a = s.create_post(&new_post("a", None)).await.unwrap();
        let b = s.create_post(&new_post("b", None)).await.unwrap();
        for c in ["one", "two", "three"] {
            s.create_comment(&new_comment(a.id, c)).await.unwrap();
        }
        s.create_comment(&new_comment(b.id, "other")).await.unwrap();

        let (comments, total) = s.list_comments(a.id, PageRequest::default()).await.unwrap();
        assert_eq!(total, 3);
        let contents: Vec<_> = comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, ["one", "two", "three"]);

        let (empty, total) = s.list_comments(999, PageRequest::default()).await.unwrap();
        assert!(empty.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn comments_for_posts_skips_deleted() {
        let s = storage();
        let a = s.create_post(&new_post("a", None)).await.unwrap();
        let b = s.create_post(&new_post("b", None)).await.unwrap();
        let c1 = s.create_comment(&new_comment(a.id, "a1")).await.unwrap();
        s.create_comment(&new_comment(b.id, "b1")).await.unwrap();
        s.delete_comment(c1.id).await.unwrap();

        let all = s.comments_for_posts(&[a.id, b.id]).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].post_id, b.id);
        assert!(s.comments_for_posts(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_post_keeps_comments_rows() {
        let s = storage();
        let p = s.create_post(&new_post("p", None)).await.unwrap();
        let c = s.create_comment(&new_comment(p.id, "c")).await.unwrap();
        s.delete_post(p.id).await.unwrap();
        assert!(s.get_comment(c.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_and_delete_comment() {
        let s = storage();
        let p = s.create_post(&new_post("p", None)).await.unwrap();
        let mut c = s.create_comment(&new_comment(p.id, "before")).await.unwrap();
        c.content = "after".into();
        s.update_comment(&c).await.unwrap();
        assert_eq!(s.get_comment(c.id).await.unwrap().unwrap().content, "after");

        s.delete_comment(c.id).await.unwrap();
        assert!(s.get_comment(c.id).await.unwrap().is_none());
        assert!(matches!(s.delete_comment(c.id).await, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn ids_are_not_reused() {
        let s = storage();
        let first = s.create_post(&new_post("1", None)).await.unwrap();
        s.delete_post(first.id).await.unwrap();
        let second = s.create_post(&new_post("2", None)).await.unwrap();
        assert!(second.id > first.id);
    }
}
