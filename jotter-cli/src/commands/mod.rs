//! Command implementations for the jotter CLI

pub mod migrate;
pub mod serve;
pub mod user;

pub use migrate::run_migrate;
pub use serve::run_serve;
pub use user::run_user;

use anyhow::{Context, Result};
use jotter_server::db::{create_pool_with_options, migrations};
use sqlx::SqlitePool;

use crate::config::JotterConfig;

/// `--database-url` (or `DATABASE_URL`) wins over the config file.
pub(crate) fn database_url(flag: Option<String>, config: &JotterConfig) -> String {
    flag.unwrap_or_else(|| config.database.url.clone())
}

/// Open the database and bring the schema up to date.
pub(crate) async fn connect(database_url: &str, config: &JotterConfig) -> Result<SqlitePool> {
    let pool = create_pool_with_options(database_url, config.database.max_connections)
        .await
        .with_context(|| format!("Failed to open database {database_url}"))?;

    migrations::run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}
