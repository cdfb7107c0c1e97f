//! CredentialHasher trait for one-way hashing of bearer tokens.
//!
//! Defined in securehook-core so the verifier and the setup flow share one
//! hashing algorithm without coupling to a crypto crate. The
//! `Sha256CredentialHasher` adapter lives in securehook-infra.

/// Abstraction over the one-way digest applied to webhook tokens.
///
/// The same implementation must be used when a token is stored and when an
/// incoming credential is checked.
pub trait CredentialHasher: Send + Sync {
    /// Compute the lowercase hex digest of a raw credential.
    fn hash_credential(&self, credential: &str) -> String;
}
