//! Infrastructure layer for SecureHook.
//!
//! Implements the ports defined in `securehook-core`: SQLite registration
//! storage, SHA-256 credential hashing, OS-RNG token generation and the
//! in-process webhook routing table. Also loads `config.toml`.

pub mod config;
pub mod crypto;
pub mod sqlite;
pub mod webhook;
