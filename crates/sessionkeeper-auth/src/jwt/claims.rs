//! Token payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload carried by both access and refresh tokens.
///
/// `jti` is random per token, so two pairs minted for the same user in the
/// same second still differ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject: the user the token was minted for.
    pub sub: Uuid,
    /// Issuer; must match `auth.jwt_issuer` to verify.
    pub iss: String,
    /// Issued at, in Unix seconds.
    pub iat: i64,
    /// Expiry, in Unix seconds.
    pub exp: i64,
    /// Random token id.
    pub jti: Uuid,
    /// Whether this is an access or a refresh token.
    pub typ: TokenType,
}

/// Which half of a pair a token is. Serialized as `"access"` / `"refresh"`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

impl Claims {
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        timestamp(self.exp)
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        timestamp(self.iat)
    }

    /// Seconds until `exp`, saturating at zero.
    pub fn remaining_ttl_seconds(&self) -> u64 {
        u64::try_from(self.exp - Utc::now().timestamp()).unwrap_or(0)
    }
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&TokenType::Refresh).expect("serialize"),
            "\"refresh\""
        );
        assert_eq!(
            serde_json::from_str::<TokenType>("\"access\"").expect("deserialize"),
            TokenType::Access
        );
    }

    #[test]
    fn test_time_helpers() {
        let now = Utc::now().timestamp();
        let mut claims = Claims {
            sub: Uuid::new_v4(),
            iss: "sessionkeeper".into(),
            iat: now - 100,
            exp: now - 10,
            jti: Uuid::new_v4(),
            typ: TokenType::Access,
        };
        assert_eq!(claims.remaining_ttl_seconds(), 0);
        assert_eq!(claims.expires_at().timestamp(), now - 10);
        assert_eq!(claims.issued_at().timestamp(), now - 100);

        claims.exp = now + 600;
        assert!(claims.remaining_ttl_seconds() > 590);
    }
}
