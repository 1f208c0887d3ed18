//! Password hashing and credential verification.

pub mod hasher;

pub use hasher::{Argon2Verifier, CredentialVerifier};
