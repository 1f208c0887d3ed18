//! In-memory user directory for tests and embedding.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use sessionkeeper_core::error::AppError;
use sessionkeeper_entity::user::User;

use super::directory::UserDirectory;

/// Users keyed by lowercased email.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserDirectory {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl MemoryUserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user.
    pub async fn insert(&self, user: User) {
        self.users
            .write()
            .await
            .insert(user.email.to_lowercase(), user);
    }

    /// Create an active user with the given hash and return it.
    pub async fn add(&self, email: &str, password_hash: String) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.insert(user.clone()).await;
        user
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .get(&email.trim().to_lowercase())
            .cloned())
    }
}
