//! Token issuance capability.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use sessionkeeper_core::config::AuthConfig;
use sessionkeeper_core::error::AppError;
use sessionkeeper_entity::session::TokenPair;

use super::claims::{Claims, TokenType};
use super::decoder::JwtDecoder;
use super::encoder::JwtEncoder;

/// Mints and parses signed, time-bounded tokens.
pub trait TokenIssuer: Send + Sync + std::fmt::Debug {
    /// Issue an access token, returning it with its expiry.
    fn issue_access(&self, subject: Uuid) -> Result<(String, DateTime<Utc>), AppError>;

    /// Issue a refresh token, returning it with its expiry.
    fn issue_refresh(&self, subject: Uuid) -> Result<(String, DateTime<Utc>), AppError>;

    /// Issue both tokens. Either both are returned or neither is.
    fn issue_pair(&self, subject: Uuid) -> Result<TokenPair, AppError> {
        let (access_token, access_expires_at) = self.issue_access(subject)?;
        let (refresh_token, refresh_expires_at) = self.issue_refresh(subject)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
        })
    }

    /// Verify a token and return its claims.
    fn parse(&self, token: &str) -> Result<Claims, AppError>;
}

/// HS256 JWT issuer built from [`AuthConfig`].
#[derive(Debug, Clone)]
pub struct JwtIssuer {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl JwtIssuer {
    /// Creates an issuer sharing one secret between signing and verification.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        Ok(Self {
            encoder: JwtEncoder::new(config)?,
            decoder: JwtDecoder::new(config),
        })
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue_access(&self, subject: Uuid) -> Result<(String, DateTime<Utc>), AppError> {
        self.encoder.encode(subject, TokenType::Access)
    }

    fn issue_refresh(&self, subject: Uuid) -> Result<(String, DateTime<Utc>), AppError> {
        self.encoder.encode(subject, TokenType::Refresh)
    }

    fn parse(&self, token: &str) -> Result<Claims, AppError> {
        self.decoder.decode(token)
    }
}
