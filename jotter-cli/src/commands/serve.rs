//! HTTP server command
//!
//! Settings resolve as flag, then environment, then config file, then the
//! built-in defaults.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use jotter_server::http::{run_server, Mode, ServerConfig};

use super::{connect, database_url};
use crate::config::JotterConfig;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default from config: 127.0.0.1:3030)
    #[arg(long, short = 'b', env = "JOTTER_BIND")]
    pub bind: Option<SocketAddr>,

    /// Database URL (overrides config)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Which app to serve: `single` or `multi`
    #[arg(long, short = 'm', env = "JOTTER_MODE")]
    pub mode: Option<Mode>,

    /// Mark the session cookie Secure (serve behind HTTPS)
    #[arg(long)]
    pub secure_cookies: bool,
}

impl ServeArgs {
    fn server_config(&self, config: &JotterConfig) -> Result<ServerConfig> {
        let bind_addr = match self.bind {
            Some(addr) => addr,
            None => config.server.bind.parse().with_context(|| {
                format!("Invalid bind address in config: {}", config.server.bind)
            })?,
        };

        Ok(ServerConfig {
            bind_addr,
            mode: self.mode.unwrap_or(config.server.mode),
            secure_cookies: self.secure_cookies || config.server.secure_cookies,
            remember_days: config.server.remember_days,
        })
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config: &JotterConfig) -> Result<()> {
    let server_config = args.server_config(config)?;
    let database_url = database_url(args.database_url, config);

    tracing::info!(
        mode = %server_config.mode,
        database = %database_url,
        "starting jotter on {}",
        server_config.bind_addr
    );

    let pool = connect(&database_url, config).await?;

    // Run server (blocks until shutdown)
    run_server(pool, server_config)
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(bind: Option<&str>, mode: Option<Mode>) -> ServeArgs {
        ServeArgs {
            bind: bind.map(|b| b.parse().unwrap()),
            database_url: None,
            mode,
            secure_cookies: false,
        }
    }

    #[test]
    fn config_file_fills_missing_flags() {
        let mut config = JotterConfig::default();
        config.server.bind = "0.0.0.0:8080".into();
        config.server.mode = Mode::Single;
        config.server.secure_cookies = true;

        let resolved = args(None, None).server_config(&config).unwrap();
        assert_eq!(resolved.bind_addr.port(), 8080);
        assert_eq!(resolved.mode, Mode::Single);
        assert!(resolved.secure_cookies);
    }

    #[test]
    fn flags_win_over_config() {
        let mut config = JotterConfig::default();
        config.server.mode = Mode::Single;

        let resolved = args(Some("127.0.0.1:4000"), Some(Mode::Multi))
            .server_config(&config)
            .unwrap();
        assert_eq!(resolved.bind_addr.port(), 4000);
        assert_eq!(resolved.mode, Mode::Multi);
    }

    #[test]
    fn bad_configured_address_is_an_error() {
        let mut config = JotterConfig::default();
        config.server.bind = "not an address".into();

        assert!(args(None, None).server_config(&config).is_err());
    }
}
