//! CLI command definitions and dispatch.

pub mod device;
pub mod migrate;
pub mod session;
pub mod token;
pub mod user;

use clap::{Parser, Subcommand};
use sqlx::PgPool;
use uuid::Uuid;

use sessionkeeper_auth::SessionController;
use sessionkeeper_core::config::AppConfig;
use sessionkeeper_core::error::AppError;
use sessionkeeper_database::DatabasePool;

use crate::output::OutputFormat;

/// SessionKeeper: device-bound session administration
#[derive(Debug, Parser)]
#[command(name = "sessionkeeper", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// User account management
    User(user::UserArgs),
    /// Session revocation
    Session(session::SessionArgs),
    /// Device management
    Device(device::DeviceArgs),
    /// Token inspection
    Token(token::TokenArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, config, self.format).await,
            Commands::User(args) => user::execute(args, config, self.format).await,
            Commands::Session(args) => session::execute(args, config).await,
            Commands::Device(args) => device::execute(args, config, self.format).await,
            Commands::Token(args) => token::execute(args, config, self.format),
        }
    }
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<PgPool, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    pool.health_check().await?;
    Ok(pool.into_pool())
}

/// Helper: build a PostgreSQL-backed session controller
pub async fn create_controller(config: &AppConfig) -> Result<SessionController, AppError> {
    let pool = create_db_pool(config).await?;
    SessionController::with_postgres(pool, &config.auth)
}

/// Helper: parse a user ID argument
pub fn parse_user_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|e| AppError::validation(format!("Invalid user ID '{raw}': {e}")))
}

/// Helper: ask for confirmation unless `force` is set
pub fn confirm(prompt: &str, force: bool) -> Result<bool, AppError> {
    if force {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_device_rename() {
        let cli = Cli::try_parse_from([
            "sessionkeeper",
            "--format",
            "json",
            "device",
            "rename",
            "8c0c6c1e-3f5e-4c43-9f53-0d0a4e4b7a10",
            "abc123",
            "Work laptop",
        ])
        .expect("parse");
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Device(_)));
    }

    #[test]
    fn test_parse_user_id() {
        assert!(parse_user_id("8c0c6c1e-3f5e-4c43-9f53-0d0a4e4b7a10").is_ok());
        assert_eq!(
            parse_user_id("nope").unwrap_err().kind,
            sessionkeeper_core::ErrorKind::Validation
        );
    }
}
