//! Bearer credential verification.
//!
//! The `Authorization` header must carry `Bearer <token>`. The token is
//! hashed with the endpoint's [`CredentialHasher`] and compared against the
//! stored digest in constant time.

use std::sync::Arc;

use subtle::ConstantTimeEq;

use securehook_types::error::AuthFailure;
use securehook_types::registration::CredentialHash;
use securehook_types::request::RequestHeaders;

use crate::service::hash::CredentialHasher;

/// Literal scheme prefix, case-sensitive, one space.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Checks the bearer credential of a request against a stored digest.
///
/// Pure: holds only the hasher, never the stored hash itself.
#[derive(Clone)]
pub struct CredentialVerifier {
    hasher: Arc<dyn CredentialHasher>,
}

impl CredentialVerifier {
    pub fn new(hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { hasher }
    }

    /// Verify the request headers against `stored_hash`.
    ///
    /// - No header, or an empty value: [`AuthFailure::MissingHeader`]
    /// - Value not starting with `"Bearer "`: [`AuthFailure::MalformedHeader`]
    /// - Digest of the token differs: [`AuthFailure::InvalidToken`]
    ///
    /// An empty token after the prefix is hashed like any other token.
    pub fn verify(
        &self,
        headers: &RequestHeaders,
        stored_hash: &CredentialHash,
    ) -> Result<(), AuthFailure> {
        let header = headers
            .get("authorization")
            .filter(|value| !value.is_empty())
            .ok_or(AuthFailure::MissingHeader)?;

        let token = header
            .strip_prefix(BEARER_PREFIX)
            .ok_or(AuthFailure::MalformedHeader)?;

        let computed = self.hasher.hash_credential(token);

        if constant_time_eq(computed.as_bytes(), stored_hash.as_bytes()) {
            Ok(())
        } else {
            Err(AuthFailure::InvalidToken)
        }
    }
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier").finish_non_exhaustive()
    }
}

/// Constant-time byte comparison.
///
/// Returns true if and only if `a == b`. For equal-length inputs the time
/// taken does not depend on where the first differing byte is.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestSha256;

    fn verifier() -> CredentialVerifier {
        CredentialVerifier::new(Arc::new(TestSha256))
    }

    fn stored(token: &str) -> CredentialHash {
        CredentialHash::from_hex(&TestSha256.hash_credential(token)).unwrap()
    }

    fn headers(value: &str) -> RequestHeaders {
        [("Authorization", value)].into_iter().collect()
    }

    #[test]
    fn test_valid_bearer_token() {
        let result = verifier().verify(&headers("Bearer test_token"), &stored("test_token"));
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_header_name_case_insensitive() {
        let headers: RequestHeaders = [("AUTHORIZATION", "Bearer test_token")].into_iter().collect();
        assert!(verifier().verify(&headers, &stored("test_token")).is_ok());
    }

    #[test]
    fn test_missing_header() {
        let result = verifier().verify(&RequestHeaders::new(), &stored("test_token"));
        assert_eq!(result, Err(AuthFailure::MissingHeader));
    }

    #[test]
    fn test_empty_header_counts_as_missing() {
        let result = verifier().verify(&headers(""), &stored("test_token"));
        assert_eq!(result, Err(AuthFailure::MissingHeader));
    }

    #[test]
    fn test_no_bearer_prefix() {
        let result = verifier().verify(&headers("InvalidFormat"), &stored("test_token"));
        assert_eq!(result, Err(AuthFailure::MalformedHeader));
    }

    #[test]
    fn test_other_scheme_rejected() {
        let result = verifier().verify(&headers("Basic dGVzdF90b2tlbg=="), &stored("test_token"));
        assert_eq!(result, Err(AuthFailure::MalformedHeader));
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        let result = verifier().verify(&headers("bearer test_token"), &stored("test_token"));
        assert_eq!(result, Err(AuthFailure::MalformedHeader));
    }

    #[test]
    fn test_prefix_requires_single_space() {
        // "Bearer" + two spaces leaves " test_token" as the credential
        let result = verifier().verify(&headers("Bearer  test_token"), &stored("test_token"));
        assert_eq!(result, Err(AuthFailure::InvalidToken));

        let result = verifier().verify(&headers("Bearertest_token"), &stored("test_token"));
        assert_eq!(result, Err(AuthFailure::MalformedHeader));
    }

    #[test]
    fn test_wrong_token() {
        let result = verifier().verify(&headers("Bearer wrong_token"), &stored("test_token"));
        assert_eq!(result, Err(AuthFailure::InvalidToken));
    }

    #[test]
    fn test_empty_token_is_hashed_not_rejected_early() {
        let result = verifier().verify(&headers("Bearer "), &stored("test_token"));
        assert_eq!(result, Err(AuthFailure::InvalidToken));

        // An endpoint provisioned with the empty string would accept it.
        let result = verifier().verify(&headers("Bearer "), &stored(""));
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_hashing_is_deterministic() {
        assert_eq!(
            TestSha256.hash_credential("test_token"),
            TestSha256.hash_credential("test_token")
        );
    }

    #[test]
    fn test_constant_time_eq_equal() {
        assert!(constant_time_eq(b"hello", b"hello"));
    }

    #[test]
    fn test_constant_time_eq_not_equal() {
        assert!(!constant_time_eq(b"hello", b"world"));
    }

    #[test]
    fn test_constant_time_eq_is_symmetric() {
        let a = TestSha256.hash_credential("a");
        let b = TestSha256.hash_credential("b");
        assert_eq!(
            constant_time_eq(a.as_bytes(), b.as_bytes()),
            constant_time_eq(b.as_bytes(), a.as_bytes())
        );
        assert!(constant_time_eq(a.as_bytes(), a.clone().as_bytes()));
    }

    #[test]
    fn test_constant_time_eq_different_lengths() {
        assert!(!constant_time_eq(b"short", b"longer string"));
    }

    #[test]
    fn test_constant_time_eq_empty() {
        assert!(constant_time_eq(b"", b""));
    }
}
