//! Device identity derived from connection metadata.

pub mod resolver;
pub mod user_agent;

pub use resolver::{DeviceResolver, MetadataDeviceResolver};
pub use user_agent::UserAgentInfo;
