//! Device entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::DeviceType;

/// Raw connection metadata supplied by the transport for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMetadata {
    /// Client IP address as text.
    pub ip: String,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl DeviceMetadata {
    /// Bundle an IP and user-agent.
    pub fn new(ip: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            user_agent: user_agent.into(),
        }
    }
}

/// A device identity resolved from [`DeviceMetadata`].
///
/// `id` is stable for a given user-agent and IP pair; everything else is
/// descriptive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// Derived identifier (hex digest).
    pub id: String,
    /// Default display name, e.g. `"Firefox on Linux"`.
    pub name: String,
    /// Form factor.
    pub device_type: DeviceType,
    /// Operating system family.
    pub os: String,
    /// Browser family.
    pub browser: String,
    /// Original user-agent.
    pub user_agent: String,
    /// Original IP.
    pub ip: String,
}

/// A persisted device belonging to one user.
///
/// Created on the first successful login from the device and refreshed on
/// every later login or refresh. Only explicit deletion removes it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Device {
    /// Derived identifier, unique per owner.
    pub id: String,
    /// Owning user.
    pub user_id: Uuid,
    /// Display name; user-editable.
    pub name: String,
    /// Form factor.
    pub device_type: DeviceType,
    /// Operating system family.
    pub os: String,
    /// Browser family.
    pub browser: String,
    /// Last seen user-agent.
    pub user_agent: String,
    /// Last seen IP.
    pub ip: String,
    /// Last login or refresh from this device.
    pub last_active: DateTime<Utc>,
    /// First login from this device.
    pub created_at: DateTime<Utc>,
}

impl Device {
    /// Build the row that a first login from `identity` would create.
    pub fn from_identity(user_id: Uuid, identity: &DeviceIdentity, now: DateTime<Utc>) -> Self {
        Self {
            id: identity.id.clone(),
            user_id,
            name: identity.name.clone(),
            device_type: identity.device_type,
            os: identity.os.clone(),
            browser: identity.browser.clone(),
            user_agent: identity.user_agent.clone(),
            ip: identity.ip.clone(),
            last_active: now,
            created_at: now,
        }
    }
}
