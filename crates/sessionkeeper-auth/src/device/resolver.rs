//! Device identity resolution from connection metadata.

use std::net::Ipv6Addr;

use sha2::{Digest, Sha256};

use sessionkeeper_core::error::AppError;
use sessionkeeper_entity::device::DeviceIdentity;

use super::user_agent;

/// Derives a stable device identity from an IP and user-agent.
pub trait DeviceResolver: Send + Sync + std::fmt::Debug {
    /// Resolve the identity, failing with `IncorrectDevice` on missing or
    /// malformed input.
    fn resolve(&self, ip: &str, user_agent: &str) -> Result<DeviceIdentity, AppError>;
}

/// Resolver keyed on the exact `(user_agent, ip)` pair.
///
/// The same browser behind a new IP is a new device.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataDeviceResolver;

impl MetadataDeviceResolver {
    /// Creates a new resolver.
    pub fn new() -> Self {
        Self
    }
}

impl DeviceResolver for MetadataDeviceResolver {
    fn resolve(&self, ip: &str, user_agent: &str) -> Result<DeviceIdentity, AppError> {
        let ip = ip.trim();
        let user_agent = user_agent.trim();

        if ip.is_empty() {
            return Err(AppError::incorrect_device("Missing client IP address"));
        }
        if user_agent.is_empty() {
            return Err(AppError::incorrect_device("Missing user-agent"));
        }
        if !is_well_formed_ip(ip) {
            return Err(AppError::incorrect_device("Malformed client IP address"));
        }

        let info = user_agent::parse(user_agent);

        Ok(DeviceIdentity {
            id: device_id(user_agent, ip),
            name: info.display_name(),
            device_type: info.device_type,
            os: info.os.to_string(),
            browser: info.browser.to_string(),
            user_agent: user_agent.to_string(),
            ip: ip.to_string(),
        })
    }
}

/// Hex SHA-256 of `user_agent|ip`.
fn device_id(user_agent: &str, ip: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_agent.as_bytes());
    hasher.update(b"|");
    hasher.update(ip.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Four dot-separated decimal segments in 0..=255, or an IPv6 literal.
fn is_well_formed_ip(ip: &str) -> bool {
    if ip.contains(':') {
        return ip.parse::<Ipv6Addr>().is_ok();
    }

    let segments: Vec<&str> = ip.split('.').collect();
    segments.len() == 4
        && segments.iter().all(|s| {
            !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) && s.parse::<u8>().is_ok()
        })
}
