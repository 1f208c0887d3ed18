//! `migrate run` and `migrate status`.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use sessionkeeper_core::config::AppConfig;
use sessionkeeper_core::error::AppError;
use sessionkeeper_database::migration;

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub command: MigrateCommand,
}

#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Apply the embedded schema migrations that are not yet applied
    Run,
    /// List embedded migrations and whether each one is applied
    Status,
}

#[derive(Debug, Serialize, Tabled)]
struct MigrationRow {
    version: i64,
    description: String,
    #[tabled(rename = "state")]
    applied: &'static str,
}

pub async fn execute(
    args: &MigrateArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;

    match &args.command {
        MigrateCommand::Run => {
            migration::run_migrations(&pool).await?;
            output::print_success("Session schema is up to date");
        }
        MigrateCommand::Status => {
            let rows: Vec<MigrationRow> = migration::migration_status(&pool)
                .await?
                .into_iter()
                .map(|m| MigrationRow {
                    version: m.version,
                    description: m.description,
                    applied: if m.applied { "applied" } else { "pending" },
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
