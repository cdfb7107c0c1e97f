//! SHA-256 credential hashing.
//!
//! Implements the `CredentialHasher` trait from `securehook-core` using the
//! `sha2` crate (RustCrypto ecosystem).

use sha2::{Digest, Sha256};

use securehook_core::service::hash::CredentialHasher;

/// SHA-256 implementation of `CredentialHasher`.
///
/// Produces the 64-character lowercase hex digest of the UTF-8 token bytes,
/// which is the only form in which a webhook token is ever stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256CredentialHasher;

impl Sha256CredentialHasher {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialHasher for Sha256CredentialHasher {
    fn hash_credential(&self, credential: &str) -> String {
        format!("{:x}", Sha256::digest(credential.as_bytes()))
    }
}
