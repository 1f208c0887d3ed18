//! JWT token creation with configurable signing and TTL.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use sessionkeeper_core::config::AuthConfig;
use sessionkeeper_core::error::AppError;

use super::claims::{Claims, TokenType};

/// Creates signed HS256 tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Value of the `iss` claim.
    issuer: String,
    /// Access token lifetime.
    access_ttl: Duration,
    /// Refresh token lifetime.
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    ///
    /// Fails when a configured lifetime does not fit a duration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
            access_ttl: config.access_ttl()?,
            refresh_ttl: config.refresh_ttl()?,
        })
    }

    /// Sign a token of the given type for `subject`.
    pub fn encode(
        &self,
        subject: Uuid,
        token_type: TokenType,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::internal(format!("{token_type:?} token expiry out of range")))?;

        let claims = Claims {
            sub: subject,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
            typ: token_type,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            AppError::internal(format!("Failed to encode {token_type:?} token: {e}"))
        })?;

        Ok((token, exp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_new_rejects_unrepresentable_lifetime() {
        let mut config = AuthConfig::with_secret(SECRET);
        config.refresh_ttl_hours = u64::MAX;
        let err = JwtEncoder::new(&config).unwrap_err();
        assert_eq!(err.kind, sessionkeeper_core::ErrorKind::Configuration);
    }

    #[test]
    fn test_expiry_follows_token_type() {
        let encoder = JwtEncoder::new(&AuthConfig::with_secret(SECRET)).expect("encoder");
        let before = Utc::now();
        let (_, access_exp) = encoder.encode(Uuid::new_v4(), TokenType::Access).expect("access");
        let (_, refresh_exp) = encoder.encode(Uuid::new_v4(), TokenType::Refresh).expect("refresh");
        assert!(access_exp >= before + Duration::minutes(30));
        assert!(refresh_exp >= before + Duration::days(7));
        assert!(access_exp < refresh_exp);
    }
}
