//! Convenience result type alias for SessionKeeper.

use crate::error::AppError;

/// A specialized `Result` type for SessionKeeper operations.
pub type AppResult<T> = Result<T, AppError>;
