//! Cryptographic adapters for SecureHook.
//!
//! - `hash`: SHA-256 credential digests
//! - `token`: OS-RNG bearer token generation

pub mod hash;
pub mod token;
