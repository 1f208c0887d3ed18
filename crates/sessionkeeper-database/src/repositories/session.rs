//! Session repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use sessionkeeper_core::error::{AppError, ErrorKind};
use sessionkeeper_core::result::AppResult;
use sessionkeeper_entity::device::Device;
use sessionkeeper_entity::session::Session;

use super::device::DeviceRepository;

/// Repository for refresh-token records, one per `(user_id, device_id)`.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a device and its new refresh token in a single transaction.
    ///
    /// An existing row for the same device is overwritten and un-revoked.
    /// If either statement fails nothing is committed.
    pub async fn upsert_with_device(
        &self,
        device: &Device,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Session> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        DeviceRepository::upsert(&mut *tx, device).await?;

        let session = sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (user_id, device_id, token_hash, expires_at, revoked, last_used_at, created_at) \
             VALUES ($1, $2, $3, $4, FALSE, NOW(), NOW()) \
             ON CONFLICT (user_id, device_id) DO UPDATE SET \
             token_hash = EXCLUDED.token_hash, expires_at = EXCLUDED.expires_at, revoked = FALSE, \
             last_used_at = EXCLUDED.last_used_at, created_at = EXCLUDED.created_at \
             RETURNING *",
        )
        .bind(device.user_id)
        .bind(&device.id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert session", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit session", e)
        })?;

        Ok(session)
    }

    /// Find the session for a user's device, whatever its state.
    pub async fn find_by_user_device(
        &self,
        user_id: Uuid,
        device_id: &str,
    ) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE user_id = $1 AND device_id = $2",
        )
        .bind(user_id)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }

    /// Update the last-used timestamp of a session.
    pub async fn touch_last_used(&self, id: i64) -> AppResult<()> {
        sqlx::query("UPDATE sessions SET last_used_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update session usage", e)
            })?;
        Ok(())
    }

    /// Revoke every session of a user. Returns the number of rows changed.
    pub async fn revoke_all_by_user(&self, user_id: Uuid) -> AppResult<u64> {
        let result =
            sqlx::query("UPDATE sessions SET revoked = TRUE WHERE user_id = $1 AND NOT revoked")
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to revoke user sessions", e)
                })?;
        Ok(result.rows_affected())
    }

    /// Revoke the session of one device. Returns the number of rows changed.
    pub async fn revoke_by_device(&self, user_id: Uuid, device_id: &str) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked = TRUE \
             WHERE user_id = $1 AND device_id = $2 AND NOT revoked",
        )
        .bind(user_id)
        .bind(device_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke device session", e)
        })?;
        Ok(result.rows_affected())
    }
}
