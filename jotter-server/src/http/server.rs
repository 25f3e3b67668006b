//! Axum server setup
//!
//! Server skeleton with:
//! - Mode-dependent routes (single-user list or accounts + private notes)
//! - Cookie sessions stored in the same SQLite database, expired ones purged
//!   hourly
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::session_store::ExpiredDeletion;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::SqliteStore;

use super::routes;
use crate::db::migrations;

/// Session cookie name
pub const SESSION_COOKIE: &str = "jotter_session";

/// How often expired session records are deleted
pub const SESSION_CLEANUP_PERIOD: Duration = Duration::from_secs(60 * 60);

/// Which revision of the app is served
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One anonymous note list
    Single,
    /// Accounts, login, and per-user notes
    #[default]
    Multi,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multi => "multi",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "multi" => Ok(Self::Multi),
            other => Err(format!("unknown mode '{other}' (expected single or multi)")),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3030)
    pub bind_addr: SocketAddr,

    pub mode: Mode,

    /// Mark the session cookie `Secure` (only sent over HTTPS).
    pub secure_cookies: bool,

    /// Inactivity lifetime of a "remember me" session
    pub remember_days: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3030)),
            mode: Mode::default(),
            secure_cookies: false,
            remember_days: 30,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub pool: SqlitePool,
    pub mode: Mode,
    /// Session lifetime when "remember me" is ticked
    pub remember_for: time::Duration,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &ServerConfig) -> Self {
        Self {
            pool,
            mode: config.mode,
            remember_for: time::Duration::days(i64::from(config.remember_days)),
        }
    }
}

/// Cookie settings for the session layer.
///
/// Sessions end with the browser by default; login switches a session to
/// inactivity expiry when asked to remember the user.
pub fn session_layer<Store>(store: Store, config: &ServerConfig) -> SessionManagerLayer<Store>
where
    Store: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE)
        .with_http_only(true)
        .with_secure(config.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnSessionEnd)
}

/// Assemble every route for `state.mode` behind tracing and sessions.
pub fn build_router<Store>(state: AppState, sessions: SessionManagerLayer<Store>) -> Router
where
    Store: SessionStore + Clone,
{
    let pages = match state.mode {
        Mode::Single => routes::notes::single_user_router(),
        Mode::Multi => routes::accounts::router().merge(routes::notes::multi_user_router()),
    };

    Router::new()
        .merge(routes::health::router())
        .merge(routes::assets::router())
        .merge(pages)
        .fallback(routes::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(sessions),
        )
        .with_state(Arc::new(state))
}

/// Delete expired session records every `period` until the task is aborted.
pub fn spawn_session_cleanup(store: SqliteStore, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = store.continuously_delete_expired(period).await {
            tracing::error!(error = %e, "session cleanup stopped");
        }
    })
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// migrations::run(&pool).await?;
/// run_server(pool, ServerConfig::default()).await?;
/// ```
pub async fn run_server(pool: SqlitePool, config: ServerConfig) -> Result<(), ServerError> {
    migrations::run(&pool).await?;

    let store = SqliteStore::new(pool.clone());
    store.migrate().await?;

    if config.mode == Mode::Multi && !config.secure_cookies {
        tracing::warn!("session cookies are not marked Secure; enable secure_cookies behind HTTPS");
    }

    let cleanup = spawn_session_cleanup(store.clone(), SESSION_CLEANUP_PERIOD);
    let sessions = session_layer(store, &config);
    let app = build_router(AppState::new(pool, &config), sessions);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(mode = %config.mode, "Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    cleanup.abort();
    served?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
