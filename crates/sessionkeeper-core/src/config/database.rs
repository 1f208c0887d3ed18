//! Session database settings (`[database]`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// PostgreSQL pool settings for the session store.
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://` URL. May carry a password; never log it unredacted.
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Clamped to `max_connections` when the pool is built.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// How long to wait for a free connection before giving up.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

impl DatabaseConfig {
    /// Pool acquire timeout.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// Idle connection lifetime.
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_seconds)
    }

    /// Reject settings the pool cannot work with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.url.trim().is_empty() {
            return Err(AppError::configuration("database.url must be set"));
        }
        if self.max_connections == 0 {
            return Err(AppError::configuration(
                "database.max_connections must be at least 1",
            ));
        }
        if self.connect_timeout_seconds == 0 {
            return Err(AppError::configuration(
                "database.connect_timeout_seconds must be at least 1",
            ));
        }
        Ok(())
    }
}

// The URL is left out so credentials never reach debug logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .field("idle_timeout_seconds", &self.idle_timeout_seconds)
            .finish()
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_idle_timeout() -> u64 {
    600
}
