//! User identity as seen by the session subsystem.

pub mod model;

pub use model::{CreateUser, Credentials, User};
