//! User account CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use sessionkeeper_auth::{Argon2Verifier, CredentialVerifier};
use sessionkeeper_core::config::AppConfig;
use sessionkeeper_core::error::AppError;
use sessionkeeper_database::repositories::UserRepository;
use sessionkeeper_entity::user::{CreateUser, User};

use crate::output::{self, OutputFormat};

/// Shortest password accepted when seeding an account.
const MIN_PASSWORD_LEN: usize = 8;

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a user account
    Create {
        /// Login email
        #[arg(long)]
        email: String,
        /// Password; prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Allow a user to log in again
    Enable {
        /// Login email
        email: String,
    },
    /// Block a user from logging in
    Disable {
        /// Login email
        email: String,
    },
}

/// User display row
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Email
    email: String,
    /// Active
    active: String,
    /// Created at
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            email: u.email.clone(),
            active: if u.is_active { "✓" } else { "✗" }.to_string(),
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let user_repo = UserRepository::new(pool);

    match &args.command {
        UserCommand::Create { email, password } => {
            let email = email.trim();
            if email.is_empty() || !email.contains('@') {
                return Err(AppError::validation(format!("Invalid email '{email}'")));
            }

            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };
            if password.chars().count() < MIN_PASSWORD_LEN {
                return Err(AppError::validation(format!(
                    "Password must be at least {MIN_PASSWORD_LEN} characters"
                )));
            }

            let password_hash = Argon2Verifier::new().hash(&password)?;
            let user = user_repo
                .create(&CreateUser {
                    email: email.to_string(),
                    password_hash,
                })
                .await?;

            output::print_list(&[UserRow::from(&user)], format);
            output::print_success(&format!("User '{}' created", user.email));
        }
        UserCommand::Enable { email } => set_active(&user_repo, email, true).await?,
        UserCommand::Disable { email } => set_active(&user_repo, email, false).await?,
    }

    Ok(())
}

async fn set_active(repo: &UserRepository, email: &str, active: bool) -> Result<(), AppError> {
    let user = repo
        .find_by_email(email)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User '{email}' not found")))?;

    repo.set_active(user.id, active).await?;

    let verb = if active { "enabled" } else { "disabled" };
    output::print_success(&format!("User '{}' {verb}", user.email));
    Ok(())
}
