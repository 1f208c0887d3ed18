//! # sessionkeeper-database
//!
//! PostgreSQL connection management and concrete repository
//! implementations for users, devices, and sessions.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
