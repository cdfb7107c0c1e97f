//! Request authentication for webhook endpoints.

pub mod verifier;

pub use verifier::{BEARER_PREFIX, CredentialVerifier};
