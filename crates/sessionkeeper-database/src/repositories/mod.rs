//! Repository implementations for SessionKeeper entities.

pub mod device;
pub mod session;
pub mod user;

pub use device::DeviceRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
