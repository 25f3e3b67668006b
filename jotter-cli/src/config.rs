//! Configuration file (`~/.jotter/config.toml`) and the `config` subcommand
//!
//! The file is optional: missing sections and keys fall back to defaults.
//! Command-line flags and environment variables are applied on top by the
//! individual commands.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jotter_server::http::Mode;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "JOTTER_CONFIG";

const TEMPLATE: &str = r#"# jotter configuration
#
# Command-line flags and environment variables (DATABASE_URL, JOTTER_BIND,
# JOTTER_MODE) take precedence over these values.

[server]
bind = "127.0.0.1:3030"
# "single": one anonymous note list; "multi": accounts with private notes
mode = "multi"
# Mark the session cookie Secure; enable when served over HTTPS
secure_cookies = false
# How long a "remember me" login survives without activity
remember_days = 30

[database]
url = "sqlite://jotter.db"
max_connections = 5

[log]
# Used when RUST_LOG is unset and --debug is not given
level = "info"
"#;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JotterConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    pub mode: Mode,
    pub secure_cookies: bool,
    pub remember_days: u32,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3030".to_string(),
            mode: Mode::Multi,
            secure_cookies: false,
            remember_days: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "sqlite://jotter.db".to_string(),
            max_connections: jotter_server::db::DEFAULT_MAX_CONNECTIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl JotterConfig {
    /// Load the config file, or defaults when there is none.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file (invalid TOML): {}", path.display()))
    }

    /// Config file path: `$JOTTER_CONFIG`, else `~/.jotter/config.toml`
    pub fn config_path() -> PathBuf {
        if let Some(path) = env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".jotter/config.toml")
    }
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show config file path
    Path,
    /// Print the effective configuration (file merged over defaults)
    Show,
    /// Write a commented default config file
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Path => {
            println!("{}", JotterConfig::config_path().display());
            Ok(())
        }
        ConfigCommands::Show => {
            let config = JotterConfig::load()?;
            let rendered = toml::to_string_pretty(&config).context("Failed to render config")?;
            print!("{rendered}");
            Ok(())
        }
        ConfigCommands::Init(args) => run_init(&JotterConfig::config_path(), args.force),
    }
}

fn run_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}\n\nUse --force to overwrite",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    fs::write(config_path, TEMPLATE)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    println!("Created config at: {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_matches_defaults() {
        let parsed: JotterConfig = toml::from_str(TEMPLATE).unwrap();
        assert_eq!(parsed, JotterConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let parsed: JotterConfig = toml::from_str(
            r#"
            [server]
            mode = "single"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.server.mode, Mode::Single);
        assert_eq!(parsed.server.bind, "127.0.0.1:3030");
        assert_eq!(parsed.database.url, "sqlite://jotter.db");
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = JotterConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, JotterConfig::default());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server\nbind = ").unwrap();

        let err = JotterConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        run_init(&path, false).unwrap();
        assert!(path.exists());
        assert!(run_init(&path, false).is_err());
        run_init(&path, true).unwrap();
    }
}
