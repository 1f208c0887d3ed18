//! In-memory session store using a Tokio mutex for single-process use.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use sessionkeeper_core::error::AppError;
use sessionkeeper_entity::device::{Device, DeviceIdentity};
use sessionkeeper_entity::session::Session;

use super::digest::{digests_match, hash_token};
use super::store::SessionStore;

type Key = (Uuid, String);

/// Internal state for the memory-based store.
#[derive(Debug, Default)]
struct InnerState {
    devices: HashMap<Key, Device>,
    sessions: HashMap<Key, Session>,
    next_id: i64,
}

/// [`SessionStore`] kept in process memory.
///
/// Mirrors the PostgreSQL semantics: one session per `(user, device)`,
/// user-chosen device names survive re-login, and deleting a device drops
/// its session. Nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    state: Arc<Mutex<InnerState>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a device's session row, whatever its state.
    pub async fn session(&self, user_id: Uuid, device_id: &str) -> Option<Session> {
        self.state
            .lock()
            .await
            .sessions
            .get(&(user_id, device_id.to_string()))
            .cloned()
    }

    /// Number of unrevoked, unexpired sessions of a user.
    pub async fn active_count(&self, user_id: Uuid) -> usize {
        self.state
            .lock()
            .await
            .sessions
            .values()
            .filter(|s| s.user_id == user_id && s.is_active())
            .count()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
        device: &DeviceIdentity,
    ) -> Result<Session, AppError> {
        let now = Utc::now();
        let key = (user_id, device.id.clone());
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let fresh = Device::from_identity(user_id, device, now);
        state
            .devices
            .entry(key.clone())
            .and_modify(|d| {
                d.device_type = fresh.device_type;
                d.os = fresh.os.clone();
                d.browser = fresh.browser.clone();
                d.user_agent = fresh.user_agent.clone();
                d.ip = fresh.ip.clone();
                d.last_active = now;
            })
            .or_insert(fresh);

        let id = match state.sessions.get(&key) {
            Some(existing) => existing.id,
            None => {
                state.next_id += 1;
                state.next_id
            }
        };

        let session = Session {
            id,
            user_id,
            device_id: device.id.clone(),
            token_hash: token_hash.to_string(),
            expires_at,
            revoked: false,
            last_used_at: now,
            created_at: now,
        };
        state.sessions.insert(key, session.clone());
        Ok(session)
    }

    async fn is_valid(
        &self,
        user_id: Uuid,
        device: &DeviceIdentity,
        presented_token: &str,
    ) -> Result<bool, AppError> {
        let mut state = self.state.lock().await;
        let Some(session) = state.sessions.get_mut(&(user_id, device.id.clone())) else {
            return Ok(false);
        };

        if !session.is_active() || !digests_match(&session.token_hash, &hash_token(presented_token))
        {
            return Ok(false);
        }

        session.last_used_at = Utc::now();
        Ok(true)
    }

    async fn revoke_all(&self, user_id: Uuid) -> Result<u64, AppError> {
        let mut state = self.state.lock().await;
        let mut count = 0;
        for session in state
            .sessions
            .values_mut()
            .filter(|s| s.user_id == user_id && !s.revoked)
        {
            session.revoked = true;
            count += 1;
        }
        Ok(count)
    }

    async fn revoke_by_device(&self, user_id: Uuid, device_id: &str) -> Result<u64, AppError> {
        let mut state = self.state.lock().await;
        match state.sessions.get_mut(&(user_id, device_id.to_string())) {
            Some(session) if !session.revoked => {
                session.revoked = true;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn list_devices(&self, user_id: Uuid) -> Result<Vec<Device>, AppError> {
        let state = self.state.lock().await;
        let mut devices: Vec<Device> = state
            .devices
            .values()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect();
        devices.sort_by(|a, b| b.last_active.cmp(&a.last_active));
        Ok(devices)
    }

    async fn get_device(
        &self,
        user_id: Uuid,
        device_id: &str,
    ) -> Result<Option<Device>, AppError> {
        let state = self.state.lock().await;
        Ok(state.devices.get(&(user_id, device_id.to_string())).cloned())
    }

    async fn rename_device(
        &self,
        user_id: Uuid,
        device_id: &str,
        name: &str,
    ) -> Result<bool, AppError> {
        let mut state = self.state.lock().await;
        match state.devices.get_mut(&(user_id, device_id.to_string())) {
            Some(device) => {
                device.name = name.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_device(&self, user_id: Uuid, device_id: &str) -> Result<bool, AppError> {
        let mut state = self.state.lock().await;
        let key = (user_id, device_id.to_string());
        state.sessions.remove(&key);
        Ok(state.devices.remove(&key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use sessionkeeper_entity::device::DeviceType;

    use super::*;

    fn identity(id: &str) -> DeviceIdentity {
        DeviceIdentity {
            id: id.to_string(),
            name: "Firefox on Linux".into(),
            device_type: DeviceType::Desktop,
            os: "Linux".into(),
            browser: "Firefox".into(),
            user_agent: "ua".into(),
            ip: "10.0.0.1".into(),
        }
    }

    fn in_a_week() -> DateTime<Utc> {
        Utc::now() + chrono::Duration::days(7)
    }

    #[tokio::test]
    async fn test_one_session_per_device() {
        let store = MemorySessionStore::new();
        let user = Uuid::new_v4();
        let d1 = identity("d1");

        store
            .create(user, &hash_token("t1"), in_a_week(), &d1)
            .await
            .expect("create");
        store
            .create(user, &hash_token("t2"), in_a_week(), &d1)
            .await
            .expect("create");

        assert_eq!(store.active_count(user).await, 1);
        assert!(!store.is_valid(user, &d1, "t1").await.expect("valid"));
        assert!(store.is_valid(user, &d1, "t2").await.expect("valid"));
    }

    #[tokio::test]
    async fn test_expired_and_revoked_are_invalid() {
        let store = MemorySessionStore::new();
        let user = Uuid::new_v4();
        let d1 = identity("d1");
        let d2 = identity("d2");

        store
            .create(user, &hash_token("old"), Utc::now() - chrono::Duration::seconds(1), &d1)
            .await
            .expect("create");
        assert!(!store.is_valid(user, &d1, "old").await.expect("valid"));

        store
            .create(user, &hash_token("t"), in_a_week(), &d2)
            .await
            .expect("create");
        assert_eq!(store.revoke_by_device(user, "d2").await.expect("revoke"), 1);
        assert_eq!(store.revoke_by_device(user, "d2").await.expect("revoke"), 0);
        assert!(!store.is_valid(user, &d2, "t").await.expect("valid"));
    }

    #[tokio::test]
    async fn test_revoke_all_scoped_to_user() {
        let store = MemorySessionStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        store.create(alice, &hash_token("a1"), in_a_week(), &identity("d1")).await.expect("create");
        store.create(alice, &hash_token("a2"), in_a_week(), &identity("d2")).await.expect("create");
        store.create(bob, &hash_token("b1"), in_a_week(), &identity("d1")).await.expect("create");

        assert_eq!(store.revoke_all(alice).await.expect("revoke"), 2);
        assert_eq!(store.revoke_all(alice).await.expect("revoke"), 0);
        assert_eq!(store.active_count(alice).await, 0);
        assert_eq!(store.active_count(bob).await, 1);
    }

    #[tokio::test]
    async fn test_rename_survives_relogin_and_delete_cascades() {
        let store = MemorySessionStore::new();
        let user = Uuid::new_v4();
        let d1 = identity("d1");
        store.create(user, &hash_token("t1"), in_a_week(), &d1).await.expect("create");

        assert!(store.rename_device(user, "d1", "Work laptop").await.expect("rename"));
        store.create(user, &hash_token("t2"), in_a_week(), &d1).await.expect("create");
        let device = store.get_device(user, "d1").await.expect("get").expect("present");
        assert_eq!(device.name, "Work laptop");

        assert!(store.delete_device(user, "d1").await.expect("delete"));
        assert!(store.session(user, "d1").await.is_none());
        assert!(!store.delete_device(user, "d1").await.expect("delete"));
        assert!(!store.rename_device(user, "d1", "x").await.expect("rename"));
    }
}
