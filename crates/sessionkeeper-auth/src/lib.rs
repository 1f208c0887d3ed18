//! # sessionkeeper-auth
//!
//! Password authentication and device-bound session management.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing and credential verification
//! - `jwt`: HS256 access and refresh token issuance and parsing
//! - `device`: device identity derived from IP and user-agent
//! - `user`: read-only user lookup for login
//! - `session`: session persistence, rotation, and revocation

pub mod context;
pub mod device;
pub mod jwt;
pub mod password;
pub mod session;
pub mod user;

pub use context::AuthContext;
pub use device::{DeviceResolver, MetadataDeviceResolver};
pub use jwt::{Claims, JwtIssuer, TokenIssuer, TokenType};
pub use password::{Argon2Verifier, CredentialVerifier};
pub use session::{MemorySessionStore, PgSessionStore, SessionController, SessionStore};
pub use user::{MemoryUserDirectory, UserDirectory};
