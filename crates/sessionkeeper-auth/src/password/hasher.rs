//! Argon2id password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use sessionkeeper_core::error::AppError;

/// Checks plaintext passwords against stored salted hashes.
pub trait CredentialVerifier: Send + Sync + std::fmt::Debug {
    /// Hash a plaintext password with a fresh random salt.
    fn hash(&self, password: &str) -> Result<String, AppError>;

    /// Verify `password` against `hash`.
    ///
    /// A mismatch is [`ErrorKind::InvalidCredentials`]; a hash that cannot
    /// be parsed is [`ErrorKind::Hashing`].
    ///
    /// [`ErrorKind::InvalidCredentials`]: sessionkeeper_core::ErrorKind::InvalidCredentials
    /// [`ErrorKind::Hashing`]: sessionkeeper_core::ErrorKind::Hashing
    fn compare(&self, hash: &str, password: &str) -> Result<(), AppError>;
}

/// Argon2id verifier.
#[derive(Debug, Clone)]
pub struct Argon2Verifier {
    params: Params,
}

impl Argon2Verifier {
    /// Create a verifier with the argon2 crate's recommended parameters.
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Create a verifier with explicit cost parameters.
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, AppError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| AppError::hashing(format!("Invalid Argon2 parameters: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Verifier {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialVerifier for Argon2Verifier {
    fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::hashing(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    fn compare(&self, hash: &str, password: &str) -> Result<(), AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::hashing(format!("Invalid password hash format: {e}")))?;

        // Cost parameters come from the stored hash, not from self.
        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(()),
            Err(argon2::password_hash::Error::Password) => {
                Err(AppError::invalid_credentials("Password does not match"))
            }
            Err(e) => Err(AppError::hashing(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}
