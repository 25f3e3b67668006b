//! jotter-server: a small note-taking web app
//!
//! Two revisions are served from the same code: a single anonymous note list,
//! or accounts with private notes behind a login. Pages are rendered on the
//! server, data lives in SQLite.

pub mod auth;
pub mod db;
pub mod http;
pub mod models;
pub mod views;

pub use db::{create_pool, create_pool_with_options};
pub use http::{build_router, run_server, Mode, ServerConfig};
