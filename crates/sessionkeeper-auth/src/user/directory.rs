//! User lookup capability.

use async_trait::async_trait;

use sessionkeeper_core::error::AppError;
use sessionkeeper_database::repositories::UserRepository;
use sessionkeeper_entity::user::User;

/// Read-only access to user records needed for login.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug {
    /// Find a user by email, ignoring case.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        UserRepository::find_by_email(self, email).await
    }
}
