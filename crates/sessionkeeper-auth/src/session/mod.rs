//! Session persistence, rotation, and revocation.

pub mod controller;
pub mod digest;
pub mod memory;
pub mod store;

pub use controller::SessionController;
pub use digest::hash_token;
pub use memory::MemorySessionStore;
pub use store::{PgSessionStore, SessionStore};
