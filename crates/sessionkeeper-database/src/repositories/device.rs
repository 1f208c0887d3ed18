//! Device repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use sessionkeeper_core::error::{AppError, ErrorKind};
use sessionkeeper_core::result::AppResult;
use sessionkeeper_entity::device::Device;

/// Repository for per-user device records.
#[derive(Debug, Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    /// Create a new device repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a device, or refresh its metadata and `last_active` if the
    /// user already has it. A user-chosen name survives the update.
    ///
    /// Takes a connection so it can run inside a caller's transaction.
    pub async fn upsert(conn: &mut PgConnection, device: &Device) -> AppResult<Device> {
        sqlx::query_as::<_, Device>(
            "INSERT INTO devices \
             (id, user_id, name, device_type, os, browser, user_agent, ip, last_active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (user_id, id) DO UPDATE SET \
             device_type = EXCLUDED.device_type, os = EXCLUDED.os, browser = EXCLUDED.browser, \
             user_agent = EXCLUDED.user_agent, ip = EXCLUDED.ip, last_active = EXCLUDED.last_active \
             RETURNING *",
        )
        .bind(&device.id)
        .bind(device.user_id)
        .bind(&device.name)
        .bind(device.device_type)
        .bind(&device.os)
        .bind(&device.browser)
        .bind(&device.user_agent)
        .bind(&device.ip)
        .bind(device.last_active)
        .bind(device.created_at)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert device", e))
    }

    /// List a user's devices, most recently active first.
    pub async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Device>> {
        sqlx::query_as::<_, Device>(
            "SELECT * FROM devices WHERE user_id = $1 ORDER BY last_active DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list devices", e))
    }

    /// Find one of a user's devices.
    pub async fn find(&self, user_id: Uuid, device_id: &str) -> AppResult<Option<Device>> {
        sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(device_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find device", e))
    }

    /// Rename a device. Returns `false` if the user has no such device.
    pub async fn rename(&self, user_id: Uuid, device_id: &str, name: &str) -> AppResult<bool> {
        let result = sqlx::query("UPDATE devices SET name = $3 WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(device_id)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename device", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a device and, through the foreign key, its session.
    pub async fn delete(&self, user_id: Uuid, device_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM devices WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(device_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete device", e))?;
        Ok(result.rows_affected() > 0)
    }
}
