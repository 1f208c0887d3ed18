//! Unified application error types for SessionKeeper.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The session controller decides which
//! [`ErrorKind`] finally reaches a transport; see [`AppError::surface`].

use std::fmt;
use thiserror::Error;

/// Message carried by every error that crosses the transport boundary as
/// an infrastructure failure.
pub const OPAQUE_INTERNAL_MESSAGE: &str = "Internal server error";

/// Top-level error kind categorization used across the entire workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Wrong password, unknown account or unusable stored credential.
    InvalidCredentials,
    /// A token failed signature, algorithm, issuer, or expiry checks.
    InvalidToken,
    /// No valid session backs the presented refresh token.
    TokenRevoked,
    /// Connection metadata was missing or malformed.
    IncorrectDevice,
    /// The requested resource was not found.
    NotFound,
    /// Input validation failed.
    Validation,
    /// Password hashing or hash parsing failed.
    Hashing,
    /// A database error occurred.
    Database,
    /// A store call exceeded its deadline.
    Timeout,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl ErrorKind {
    /// Whether this kind describes an infrastructure failure whose details
    /// must not leave the process.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::Hashing
                | Self::Database
                | Self::Timeout
                | Self::Configuration
                | Self::Serialization
                | Self::Internal
        )
    }

    /// Whether a transport may retry the failed operation.
    ///
    /// Credential and session-state failures are final: retrying a revoked
    /// refresh token can never succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Database | Self::Internal)
    }

    /// Conventional HTTP status code for this kind.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidCredentials | Self::InvalidToken | Self::TokenRevoked => 401,
            Self::IncorrectDevice | Self::Validation => 400,
            Self::NotFound => 404,
            Self::Timeout => 504,
            Self::Hashing
            | Self::Database
            | Self::Configuration
            | Self::Serialization
            | Self::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::InvalidToken => write!(f, "INVALID_TOKEN"),
            Self::TokenRevoked => write!(f, "TOKEN_REVOKED"),
            Self::IncorrectDevice => write!(f, "INCORRECT_DEVICE"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Hashing => write!(f, "HASHING"),
            Self::Database => write!(f, "DATABASE"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout SessionKeeper.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-credentials error.
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCredentials, message)
    }

    /// Create an invalid-token error.
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidToken, message)
    }

    /// Create a token-revoked error.
    pub fn token_revoked(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenRevoked, message)
    }

    /// Create an incorrect-device error.
    pub fn incorrect_device(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IncorrectDevice, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a hashing error.
    pub fn hashing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Hashing, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Prefix the message with the name of the failing operation.
    ///
    /// The kind and source are preserved, so wrapping never changes how the
    /// error is classified.
    pub fn context(mut self, op: &str) -> Self {
        self.message = format!("{op}: {}", self.message);
        self
    }

    /// Whether a transport may retry the failed operation.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Convert this error into the form allowed to cross the transport
    /// boundary.
    ///
    /// Infrastructure errors collapse into an opaque [`ErrorKind::Internal`]
    /// with a fixed message and no source. Everything else passes through.
    pub fn surface(self) -> Self {
        if self.kind.is_infrastructure() {
            Self::internal(OPAQUE_INTERNAL_MESSAGE)
        } else {
            self
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_keeps_kind() {
        let err = AppError::database("connection reset").context("session_store.create");
        assert_eq!(err.kind, ErrorKind::Database);
        assert_eq!(err.message, "session_store.create: connection reset");
    }

    #[test]
    fn test_surface_hides_infrastructure_details() {
        let err = AppError::database("relation \"sessions\" does not exist").surface();
        assert_eq!(err.kind, ErrorKind::Internal);
        assert_eq!(err.message, OPAQUE_INTERNAL_MESSAGE);
        assert!(err.source.is_none());
    }

    #[test]
    fn test_surface_passes_session_errors_through() {
        let err = AppError::token_revoked("Refresh token is no longer valid").surface();
        assert_eq!(err.kind, ErrorKind::TokenRevoked);
    }

    #[test]
    fn test_revoked_is_not_retryable() {
        assert!(!ErrorKind::TokenRevoked.is_retryable());
        assert!(!ErrorKind::InvalidCredentials.is_retryable());
        assert!(ErrorKind::Timeout.is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::InvalidCredentials.status_code(), 401);
        assert_eq!(ErrorKind::TokenRevoked.status_code(), 401);
        assert_eq!(ErrorKind::IncorrectDevice.status_code(), 400);
        assert_eq!(ErrorKind::Internal.status_code(), 500);
    }
}
