use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::CredentialHashError;

/// Length of a hex-encoded SHA-256 digest.
pub const CREDENTIAL_HASH_LEN: usize = 64;

/// Host-unique identifier of a registered webhook endpoint.
///
/// Always a slug: lowercase alphanumerics separated by single underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EndpointId(String);

impl EndpointId {
    /// Normalize arbitrary user input into an endpoint id.
    ///
    /// Returns `None` when the input has no alphanumeric characters.
    pub fn from_input(raw: &str) -> Option<Self> {
        let slug = slugify(raw);
        if slug.is_empty() { None } else { Some(Self(slug)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EndpointId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let slug = slugify(&value);
        if slug.is_empty() || slug != value {
            return Err(format!("'{value}' is not a valid endpoint id"));
        }
        Ok(Self(slug))
    }
}

impl From<EndpointId> for String {
    fn from(id: EndpointId) -> Self {
        id.0
    }
}

/// Stored digest of an endpoint's bearer token.
///
/// Lowercase hex, [`CREDENTIAL_HASH_LEN`] characters. `Debug` never prints
/// the digest, and there is no `Display` or `Serialize` impl.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Validate a hex digest read from storage or produced by a hasher.
    pub fn from_hex(hex: &str) -> Result<Self, CredentialHashError> {
        if hex.len() != CREDENTIAL_HASH_LEN {
            return Err(CredentialHashError::InvalidLength(hex.len()));
        }
        if !hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(CredentialHashError::NotLowercaseHex);
        }
        Ok(Self(hex.to_string()))
    }

    /// Raw digest bytes (ASCII hex) for constant-time comparison.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// The digest as stored. Only persistence code should call this.
    pub fn expose_hex(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(<redacted>)")
    }
}

/// A provisioned webhook endpoint.
///
/// Immutable once created. Only the token digest is kept, never the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRegistration {
    pub id: EndpointId,
    pub credential_hash: CredentialHash,
    /// Display title ("Webhook: <id>").
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl EndpointRegistration {
    pub fn new(id: EndpointId, credential_hash: CredentialHash) -> Self {
        let title = format!("Webhook: {id}");
        Self {
            id,
            credential_hash,
            title,
            created_at: Utc::now(),
        }
    }
}

/// HTTP methods an endpoint can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WebhookMethod {
    Post,
    Put,
}

impl WebhookMethod {
    /// Methods a secure webhook accepts.
    pub const DEFAULT_ALLOWED: [WebhookMethod; 2] = [WebhookMethod::Post, WebhookMethod::Put];

    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookMethod::Post => "POST",
            WebhookMethod::Put => "PUT",
        }
    }
}

impl fmt::Display for WebhookMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebhookMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "POST" => Ok(WebhookMethod::Post),
            "PUT" => Ok(WebhookMethod::Put),
            other => Err(format!("unsupported webhook method: '{other}'")),
        }
    }
}

/// Generate an endpoint slug from free-form input.
///
/// Transliterates to ASCII, lowercases, turns every run of non-alphanumeric
/// characters into a single underscore and trims underscores from both ends.
/// The result is always safe to use as a URL path segment.
///
/// ```
/// use securehook_types::registration::slugify;
///
/// assert_eq!(slugify("My Secure Endpoint"), "my_secure_endpoint");
/// assert_eq!(slugify("  Garage--Door!! "), "garage_door");
/// assert_eq!(slugify("Café"), "cafe");
/// assert_eq!(slugify("___"), "");
/// ```
pub fn slugify(input: &str) -> String {
    let folded = deunicode::deunicode(input).to_ascii_lowercase();

    let mut result = String::with_capacity(folded.len());
    let mut prev_was_separator = true; // trims leading separators
    for c in folded.chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_was_separator = false;
        } else {
            if !prev_was_separator {
                result.push('_');
            }
            prev_was_separator = true;
        }
    }

    if result.ends_with('_') {
        result.pop();
    }

    result
}
