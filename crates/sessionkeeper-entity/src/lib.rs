//! # sessionkeeper-entity
//!
//! Domain entity models for SessionKeeper. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities derive `sqlx::FromRow`.

pub mod device;
pub mod session;
pub mod user;
