//! Schema migration command

use anyhow::Result;
use clap::Parser;

use super::{connect, database_url};
use crate::config::JotterConfig;

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

pub async fn run_migrate(args: MigrateArgs, config: &JotterConfig) -> Result<()> {
    let database_url = database_url(args.database_url, config);
    connect(&database_url, config).await?;

    println!("Database is up to date: {database_url}");
    Ok(())
}
