//! Bearer token generation.
//!
//! Tokens are 32 bytes from the OS RNG encoded as URL-safe base64 without
//! padding, giving a 43-character string that is safe in headers and URLs.

use aes_gcm::aead::{OsRng, rand_core::RngCore};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use securehook_core::service::token::TokenGenerator;

/// Number of random bytes behind each token.
pub const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, Copy, Default)]
pub struct OsRngTokenGenerator;

impl TokenGenerator for OsRngTokenGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}
