//! jotter CLI - run and administer the jotter notes server
//!
//! - `serve`: start the web app in single-user or multi-user mode
//! - `migrate`: create or update the database schema
//! - `user`: add and list accounts without going through the web form
//! - `config`: locate, show, or initialise `~/.jotter/config.toml`

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod config;
mod tracing_setup;

use config::{ConfigArgs, JotterConfig};
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "jotter",
    author,
    version,
    about = "A small web notebook with optional user accounts",
    long_about = "Serve short notes over HTTP. Single-user mode keeps one anonymous list; \
                  multi-user mode adds registration, login, and private notes per account."
)]
struct Cli {
    /// Enable debug logging (ignored when RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the web server
    Serve(commands::serve::ServeArgs),
    /// Apply database migrations and exit
    Migrate(commands::migrate::MigrateArgs),
    /// Manage user accounts
    User(commands::user::UserArgs),
    /// Inspect or create the config file
    Config(ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    // `config` and `completions` must work even when the file is broken
    let loaded = JotterConfig::load();

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        default_level: loaded
            .as_ref()
            .map(|config| config.log.level.clone())
            .unwrap_or_else(|_| TracingConfig::default().default_level),
    })
    .ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, &loaded?).await?,
        Commands::Migrate(args) => commands::run_migrate(args, &loaded?).await?,
        Commands::User(args) => commands::run_user(args, &loaded?).await?,
        Commands::Config(args) => config::run_config(args)?,
        Commands::Completions(args) => run_completions(args)?,
    }
    Ok(())
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn debug_flag_is_global() {
        let cli = Cli::try_parse_from(["jotter", "config", "path", "--debug"]).unwrap();
        assert!(cli.debug);
    }
}
