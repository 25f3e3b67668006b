//! Tracing setup for the jotter CLI
//!
//! Usage:
//!   jotter --debug ...              # Debug logging to console
//!   RUST_LOG=jotter_server=debug    # Fine-grained log control
//!
//! Without RUST_LOG the level comes from `[log] level` in the config file.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Enable debug logging (sets debug level if RUST_LOG is not set)
    pub debug: bool,
    /// Filter used when RUST_LOG is not set
    pub default_level: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            debug: false,
            default_level: "info".to_string(),
        }
    }
}

impl TracingConfig {
    fn fallback_filter(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.default_level
        }
    }
}

/// Initialize tracing with console output on stderr
pub fn init(config: &TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.fallback_filter()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(config.debug) // Show targets in debug mode
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_overrides_configured_level() {
        let config = TracingConfig {
            debug: true,
            default_level: "warn".into(),
        };
        assert_eq!(config.fallback_filter(), "debug");

        let config = TracingConfig {
            debug: false,
            default_level: "warn".into(),
        };
        assert_eq!(config.fallback_filter(), "warn");
    }
}
