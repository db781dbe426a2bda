//! Public surface for the `postboard-server` crate.
//!
//! Exposes the router builder, config and storage types so that external
//! crates (e.g. the conformance test suite) can spin up an in-process server
//! without spawning a subprocess.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod password;
pub mod router;
pub mod storage;
pub mod token;

pub use config::Config;
pub use router::build_router;
pub use storage::{sqlite::SqliteStorage, Storage};
