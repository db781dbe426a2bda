//! `postboard` — posts and comments over HTTP.
//!
//! # Quick start
//!
//! ```sh
//! # Persistent database ./postcomments.db on port 8080:
//! postboard
//!
//! # Throwaway in-memory database, human-readable logs:
//! DB_NAME=:memory: LOG_FORMAT=pretty postboard
//! ```
//!
//! # Environment variables
//!
//! See [`postboard_server::config::Config`] for the full list. A `.env` file
//! in the working directory is loaded first, if present.

use std::sync::Arc;

use postboard_server::{
    build_router,
    config::{Config, LogFormat},
    storage::{sqlite::SqliteStorage, Storage},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let from_dotenv = dotenvy::dotenv().is_ok();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(2);
        }
    };

    init_tracing(&config);
    if from_dotenv {
        tracing::debug!("loaded environment from .env");
    }

    tracing::info!(
        env = %config.env,
        port = config.port,
        db_name = %config.database.name,
        db_host = %config.database.host,
        db_port = config.database.port,
        db_user = %config.database.user,
        db_sslmode = %config.database.ssl_mode,
        db_pool_size = config.database.pool_size,
        jwt_ttl_hours = config.jwt_ttl_hours,
        rate_limit = config.rate_limit,
        rate_burst = config.rate_burst,
        cors_origins = ?config.cors_origins,
        "configuration loaded"
    );

    let storage: Arc<dyn Storage> = match SqliteStorage::open(&config.database) {
        Ok(s) => {
            match config.database.path() {
                Some(path) => tracing::info!("storage: SQLite at {}", path.display()),
                None => tracing::info!("storage: in-memory SQLite (data will not survive restart)"),
            }
            Arc::new(s)
        }
        Err(e) => {
            tracing::error!("failed to open database: {e}");
            std::process::exit(1);
        }
    };

    let addr = config.bind_addr();
    let app = build_router(storage, config);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!("listening on {addr}");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
    tracing::info!("server stopped");
}

/// `RUST_LOG` wins over `LOG_LEVEL`.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
