//! Session revocation CLI commands.

use clap::{Args, Subcommand};

use sessionkeeper_core::config::AppConfig;
use sessionkeeper_core::error::AppError;

use crate::output;

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Log a user out on every device
    RevokeAll {
        /// User ID
        user_id: String,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
    /// Log a user out on one device
    RevokeDevice {
        /// User ID
        user_id: String,
        /// Device ID
        device_id: String,
    },
}

/// Execute session commands
pub async fn execute(args: &SessionArgs, config: &AppConfig) -> Result<(), AppError> {
    match &args.command {
        SessionCommand::RevokeAll { user_id, force } => {
            let user_id = super::parse_user_id(user_id)?;
            if !super::confirm(&format!("Revoke ALL sessions of {user_id}?"), *force)? {
                println!("Cancelled.");
                return Ok(());
            }

            let controller = super::create_controller(config).await?;
            controller.logout(user_id).await?;
            output::print_success(&format!("All sessions of {user_id} revoked"));
        }
        SessionCommand::RevokeDevice { user_id, device_id } => {
            let user_id = super::parse_user_id(user_id)?;
            let controller = super::create_controller(config).await?;
            controller.revoke_device(user_id, device_id).await?;
            output::print_success(&format!("Session on device {device_id} revoked"));
        }
    }

    Ok(())
}
