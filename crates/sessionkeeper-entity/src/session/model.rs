//! Session (refresh-token record) entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The durable record binding a user, a device, and the currently valid
/// refresh token hash.
///
/// There is at most one row per `(user_id, device_id)`; issuing a new
/// refresh token for the same device overwrites it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Surrogate key.
    pub id: i64,
    /// Owning user.
    pub user_id: Uuid,
    /// Device the token was issued to.
    pub device_id: String,
    /// SHA-256 hex digest of the refresh token.
    #[serde(skip_serializing)]
    pub token_hash: String,
    /// Refresh token expiry.
    pub expires_at: DateTime<Utc>,
    /// Set on logout, global revocation, or device revocation.
    pub revoked: bool,
    /// Last successful validation of the token.
    pub last_used_at: DateTime<Utc>,
    /// When this token was issued.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Check whether the session is neither revoked nor expired at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }

    /// Check whether the session is still active.
    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(revoked: bool, expires_in: chrono::Duration) -> Session {
        let now = Utc::now();
        Session {
            id: 1,
            user_id: Uuid::new_v4(),
            device_id: "d1".into(),
            token_hash: "abc".into(),
            expires_at: now + expires_in,
            revoked,
            last_used_at: now,
            created_at: now,
        }
    }

    #[test]
    fn test_active_states() {
        assert!(session(false, chrono::Duration::hours(1)).is_active());
        assert!(!session(true, chrono::Duration::hours(1)).is_active());
        assert!(!session(false, chrono::Duration::seconds(-1)).is_active());
    }
}
