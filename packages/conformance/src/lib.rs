//! Shared helpers for the Postboard conformance test suite.
//!
//! Provides [`spawn_server`] — a function that binds a `TcpListener` on an
//! ephemeral port, wires up an in-process server backed by an in-memory
//! SQLite database, and returns both the local URL and a reference to the
//! underlying storage so tests can inspect state without going through the
//! HTTP layer.

use std::sync::Arc;

use postboard_server::{build_router, Config, SqliteStorage, Storage};

/// Start an ephemeral in-process server and return `(base_url, storage)`.
///
/// The server runs in a background `tokio` task and is bound to an
/// OS-assigned port on `127.0.0.1`. The returned `String` is the base URL,
/// e.g. `http://127.0.0.1:51234`.
///
/// # Panics
///
/// Panics if the TCP listener cannot be bound or the database cannot be
/// opened.
pub async fn spawn_server() -> (String, Arc<SqliteStorage>) {
    spawn_server_with(Config::default()).await
}

/// Like [`spawn_server`], with a caller-supplied configuration. The database
/// is always in-memory regardless of `config.database`.
pub async fn spawn_server_with(config: Config) -> (String, Arc<SqliteStorage>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");
    let base_url = format!("http://{addr}");

    let sqlite = Arc::new(SqliteStorage::open_in_memory().expect("open in-memory database"));
    let storage: Arc<dyn Storage> = Arc::clone(&sqlite) as Arc<dyn Storage>;
    let router = build_router(storage, config);

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("conformance server error");
    });

    (base_url, sqlite)
}
