//! Shared domain types for SecureHook.
//!
//! Endpoint registrations, request headers, fired events, wire responses,
//! server configuration and the error enums used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod event;
pub mod registration;
pub mod request;
pub mod response;
