//! Authenticated request identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::jwt::Claims;

/// Identity established from a valid access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user.
    pub user_id: Uuid,
    /// `jti` of the presented access token.
    pub token_id: Uuid,
    /// When the access token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl From<&Claims> for AuthContext {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.user_id(),
            token_id: claims.jti,
            expires_at: claims.expires_at(),
        }
    }
}
