//! Account administration from the command line
//!
//! Uses the same validation and hashing as the registration form.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use jotter_server::auth::{create_account, AuthError};
use jotter_server::db::{DbError, UserRepo};
use jotter_server::models::{Password, Registration, Username};

use super::{connect, database_url};
use crate::config::JotterConfig;

#[derive(Parser, Debug)]
pub struct UserArgs {
    /// Database URL (overrides config)
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: UserCommands,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Create an account (prompts for the password when not given)
    Add {
        username: String,

        /// Password; prefer the prompt so it stays out of shell history
        #[arg(long)]
        password: Option<String>,
    },
    /// List accounts
    List,
}

pub async fn run_user(args: UserArgs, config: &JotterConfig) -> Result<()> {
    let database_url = database_url(args.database_url, config);

    match args.command {
        UserCommands::Add { username, password } => {
            let username = Username::new(&username).map_err(|e| anyhow!("{e}"))?;
            let password = match password {
                Some(password) => password,
                None => prompt_password()?,
            };
            let password = Password::new(&password).map_err(|e| anyhow!("{e}"))?;

            let pool = connect(&database_url, config).await?;
            let registration = Registration { username, password };

            match create_account(&pool, &registration).await {
                Ok(user) => {
                    println!("Created user {} (id {})", user.username, user.id);
                    Ok(())
                }
                Err(AuthError::Database(DbError::Conflict { value, .. })) => {
                    Err(anyhow!("Username '{value}' is already taken"))
                }
                Err(e) => Err(e).context("Failed to create user"),
            }
        }
        UserCommands::List => {
            let pool = connect(&database_url, config).await?;
            let users = UserRepo::new(&pool)
                .list()
                .await
                .context("Failed to list users")?;

            if users.is_empty() {
                println!("No users yet");
                return Ok(());
            }

            for user in users {
                println!(
                    "{:>5}  {:<20}  {}",
                    user.id,
                    user.username,
                    user.created_at.format("%Y-%m-%d %H:%M")
                );
            }
            Ok(())
        }
    }
}

fn prompt_password() -> Result<String> {
    inquire::Password::new("Password:")
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .with_custom_confirmation_message("Confirm password:")
        .with_custom_confirmation_error_message("The passwords don't match.")
        .prompt()
        .context("Password prompt cancelled")
}
