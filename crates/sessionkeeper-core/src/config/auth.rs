//! Token and credential configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Placeholder shipped in sample configuration files; refused at load time.
pub const PLACEHOLDER_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// Shortest accepted HMAC signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted access token lifetime (one day).
pub const MAX_ACCESS_TTL_MINUTES: u64 = 24 * 60;

/// Longest accepted refresh token lifetime (one year).
pub const MAX_REFRESH_TTL_HOURS: u64 = 24 * 365;

/// Token issuance and session store settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    pub jwt_secret: String,
    /// Value of the `iss` claim; tokens with another issuer are rejected.
    #[serde(default = "default_issuer")]
    pub jwt_issuer: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in hours.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_hours: u64,
    /// Upper bound for any single session store call, in seconds.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_seconds: u64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"****")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_hours", &self.refresh_ttl_hours)
            .field("store_timeout_seconds", &self.store_timeout_seconds)
            .finish()
    }
}

impl AuthConfig {
    /// Build a configuration with default lifetimes around the given secret.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            jwt_issuer: default_issuer(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_hours: default_refresh_ttl(),
            store_timeout_seconds: default_store_timeout(),
        }
    }

    /// Reject configurations that would produce forgeable or useless tokens.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret == PLACEHOLDER_SECRET {
            return Err(AppError::configuration(
                "auth.jwt_secret still holds the placeholder value",
            ));
        }
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(AppError::configuration(format!(
                "auth.jwt_secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if self.jwt_issuer.trim().is_empty() {
            return Err(AppError::configuration("auth.jwt_issuer must not be empty"));
        }
        if !(1..=MAX_ACCESS_TTL_MINUTES).contains(&self.access_ttl_minutes) {
            return Err(AppError::configuration(format!(
                "auth.access_ttl_minutes must be between 1 and {MAX_ACCESS_TTL_MINUTES}"
            )));
        }
        if !(1..=MAX_REFRESH_TTL_HOURS).contains(&self.refresh_ttl_hours) {
            return Err(AppError::configuration(format!(
                "auth.refresh_ttl_hours must be between 1 and {MAX_REFRESH_TTL_HOURS}"
            )));
        }
        let refresh_minutes = self.refresh_ttl_hours.checked_mul(60).unwrap_or(u64::MAX);
        if self.access_ttl_minutes >= refresh_minutes {
            return Err(AppError::configuration(
                "access tokens must expire before refresh tokens",
            ));
        }
        if self.store_timeout_seconds == 0 {
            return Err(AppError::configuration(
                "auth.store_timeout_seconds must be at least 1",
            ));
        }
        Ok(())
    }

    /// Access token lifetime. Fails when the value does not fit a duration.
    pub fn access_ttl(&self) -> Result<chrono::Duration, AppError> {
        i64::try_from(self.access_ttl_minutes)
            .ok()
            .and_then(chrono::Duration::try_minutes)
            .ok_or_else(|| AppError::configuration("auth.access_ttl_minutes is out of range"))
    }

    /// Refresh token lifetime. Fails when the value does not fit a duration.
    pub fn refresh_ttl(&self) -> Result<chrono::Duration, AppError> {
        i64::try_from(self.refresh_ttl_hours)
            .ok()
            .and_then(chrono::Duration::try_hours)
            .ok_or_else(|| AppError::configuration("auth.refresh_ttl_hours is out of range"))
    }

    /// Deadline applied to each store call.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_seconds)
    }
}

fn default_issuer() -> String {
    "sessionkeeper".to_string()
}

fn default_access_ttl() -> u64 {
    30
}

fn default_refresh_ttl() -> u64 {
    24 * 7
}

fn default_store_timeout() -> u64 {
    5
}
