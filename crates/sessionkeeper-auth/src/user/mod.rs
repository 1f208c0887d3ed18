//! User lookup for login.

pub mod directory;
pub mod memory;

pub use directory::UserDirectory;
pub use memory::MemoryUserDirectory;
