//! Token inspection CLI commands.

use clap::{Args, Subcommand};

use sessionkeeper_auth::{JwtIssuer, TokenIssuer};
use sessionkeeper_core::config::AppConfig;
use sessionkeeper_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Verify a token with the configured secret and print its claims
    Inspect {
        /// Encoded JWT
        token: String,
    },
}

/// Execute token commands
pub fn execute(args: &TokenArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        TokenCommand::Inspect { token } => {
            let claims = JwtIssuer::new(&config.auth)?.parse(token.trim())?;

            let fields = [
                ("Subject", claims.sub.to_string()),
                ("Type", format!("{:?}", claims.typ)),
                ("Issuer", claims.iss.clone()),
                ("Token ID", claims.jti.to_string()),
                ("Issued at", claims.issued_at().to_rfc3339()),
                ("Expires at", claims.expires_at().to_rfc3339()),
                ("Remaining (s)", claims.remaining_ttl_seconds().to_string()),
            ];
            output::print_record(&claims, &fields, format);
        }
    }

    Ok(())
}
