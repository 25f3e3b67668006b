//! HTTP server layer
//!
//! Axum server with:
//! - Server-rendered HTML pages
//! - Cookie sessions
//! - Request tracing
//! - Graceful shutdown

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::WebError;
pub use server::{
    build_router, run_server, session_layer, AppState, Mode, ServerConfig, ServerError,
    SESSION_COOKIE,
};
