//! Token verification with a pinned algorithm.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use sessionkeeper_core::config::AuthConfig;
use sessionkeeper_core::error::AppError;

use super::claims::Claims;

/// Clock skew tolerated on `exp`, in seconds.
const LEEWAY_SECONDS: u64 = 5;

/// Checks signature, algorithm, issuer and expiry.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    pub fn new(config: &AuthConfig) -> Self {
        // Only HS256 is accepted; the header's `alg` is never trusted.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = LEEWAY_SECONDS;
        validation.set_issuer(&[config.jwt_issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Verify a token and return its claims. The token type is not checked.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        use jsonwebtoken::errors::ErrorKind as Jwt;

        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                let reason = match e.kind() {
                    Jwt::ExpiredSignature => "Token has expired",
                    Jwt::InvalidSignature => "Bad token signature",
                    Jwt::InvalidAlgorithm | Jwt::InvalidAlgorithmName => "Unexpected token algorithm",
                    Jwt::InvalidIssuer => "Unexpected token issuer",
                    Jwt::MissingRequiredClaim(_) => "Token is missing a required claim",
                    _ => "Malformed token",
                };
                AppError::invalid_token(reason)
            })?;

        Ok(token_data.claims)
    }
}
