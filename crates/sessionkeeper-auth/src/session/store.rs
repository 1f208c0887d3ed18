//! Session persistence capability and its PostgreSQL implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use sessionkeeper_core::error::AppError;
use sessionkeeper_database::repositories::{DeviceRepository, SessionRepository};
use sessionkeeper_entity::device::{Device, DeviceIdentity};
use sessionkeeper_entity::session::Session;

use super::digest::{digests_match, hash_token};

/// Durable storage of one refresh-token record per `(user, device)`.
///
/// Implementations must be safe to call concurrently.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Upsert the device and its session atomically.
    ///
    /// A prior session for the same device is replaced and un-revoked.
    async fn create(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
        device: &DeviceIdentity,
    ) -> Result<Session, AppError>;

    /// Whether `presented_token` is the current, unexpired, unrevoked
    /// refresh token for this device. Records use on success.
    async fn is_valid(
        &self,
        user_id: Uuid,
        device: &DeviceIdentity,
        presented_token: &str,
    ) -> Result<bool, AppError>;

    /// Revoke every session of a user. Returns how many were active.
    async fn revoke_all(&self, user_id: Uuid) -> Result<u64, AppError>;

    /// Revoke the session of one device. Returns how many were active.
    async fn revoke_by_device(&self, user_id: Uuid, device_id: &str) -> Result<u64, AppError>;

    /// List a user's devices, most recently active first.
    async fn list_devices(&self, user_id: Uuid) -> Result<Vec<Device>, AppError>;

    /// Fetch one device.
    async fn get_device(&self, user_id: Uuid, device_id: &str)
    -> Result<Option<Device>, AppError>;

    /// Rename a device. `false` when absent.
    async fn rename_device(
        &self,
        user_id: Uuid,
        device_id: &str,
        name: &str,
    ) -> Result<bool, AppError>;

    /// Delete a device together with its session. `false` when absent.
    async fn delete_device(&self, user_id: Uuid, device_id: &str) -> Result<bool, AppError>;
}

/// [`SessionStore`] backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgSessionStore {
    sessions: SessionRepository,
    devices: DeviceRepository,
}

impl PgSessionStore {
    /// Creates a store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            sessions: SessionRepository::new(pool.clone()),
            devices: DeviceRepository::new(pool),
        }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
        device: &DeviceIdentity,
    ) -> Result<Session, AppError> {
        let device = Device::from_identity(user_id, device, Utc::now());
        self.sessions
            .upsert_with_device(&device, token_hash, expires_at)
            .await
    }

    async fn is_valid(
        &self,
        user_id: Uuid,
        device: &DeviceIdentity,
        presented_token: &str,
    ) -> Result<bool, AppError> {
        let Some(session) = self
            .sessions
            .find_by_user_device(user_id, &device.id)
            .await?
        else {
            return Ok(false);
        };

        if !session.is_active() || !digests_match(&session.token_hash, &hash_token(presented_token))
        {
            return Ok(false);
        }

        self.sessions.touch_last_used(session.id).await?;
        Ok(true)
    }

    async fn revoke_all(&self, user_id: Uuid) -> Result<u64, AppError> {
        self.sessions.revoke_all_by_user(user_id).await
    }

    async fn revoke_by_device(&self, user_id: Uuid, device_id: &str) -> Result<u64, AppError> {
        self.sessions.revoke_by_device(user_id, device_id).await
    }

    async fn list_devices(&self, user_id: Uuid) -> Result<Vec<Device>, AppError> {
        self.devices.find_by_user(user_id).await
    }

    async fn get_device(
        &self,
        user_id: Uuid,
        device_id: &str,
    ) -> Result<Option<Device>, AppError> {
        self.devices.find(user_id, device_id).await
    }

    async fn rename_device(
        &self,
        user_id: Uuid,
        device_id: &str,
        name: &str,
    ) -> Result<bool, AppError> {
        self.devices.rename(user_id, device_id, name).await
    }

    async fn delete_device(&self, user_id: Uuid, device_id: &str) -> Result<bool, AppError> {
        self.devices.delete(user_id, device_id).await
    }
}
