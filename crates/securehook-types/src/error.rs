use thiserror::Error;

/// Why a webhook request failed authentication.
///
/// Every variant produces the same external response; the kind is only
/// used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("missing Authorization header")]
    MissingHeader,

    #[error("invalid Authorization header format (missing 'Bearer')")]
    MalformedHeader,

    #[error("invalid token")]
    InvalidToken,
}

/// The request body could not be turned into a payload mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BodyParseFailure {
    #[error("body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("body is JSON but not an object")]
    NotAnObject,
}

/// Unexpected fault on the webhook request path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookFault {
    #[error("failed to read request body: {0}")]
    BodyRead(String),

    #[error("handler panicked: {0}")]
    Panicked(String),
}

/// A stored credential digest failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialHashError {
    #[error("credential hash must be 64 hex characters, got {0}")]
    InvalidLength(usize),

    #[error("credential hash must be lowercase hex")]
    NotLowercaseHex,
}

/// Errors from the endpoint setup flow.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("endpoint id must contain at least one letter or digit")]
    InvalidSlug,

    #[error("webhook id '{0}' already exists")]
    DuplicateEndpoint(String),

    #[error("token cannot be empty")]
    EmptyToken,

    #[error("endpoint '{0}' not found")]
    NotFound(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("hasher produced an invalid digest: {0}")]
    InvalidDigest(#[from] CredentialHashError),
}

/// Errors from repository operations (used by trait definitions in securehook-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Errors reading `config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// Errors from the host routing table.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("webhook id '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("no webhook registered with id: {0}")]
    NotRegistered(String),

    #[error("method {method} not allowed for webhook {endpoint_id}")]
    MethodNotAllowed { endpoint_id: String, method: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failure_messages_are_distinct() {
        let kinds = [
            AuthFailure::MissingHeader,
            AuthFailure::MalformedHeader,
            AuthFailure::InvalidToken,
        ];
        let messages: Vec<String> = kinds.iter().map(|k| k.to_string()).collect();
        assert_eq!(messages[0], "missing Authorization header");
        assert_ne!(messages[0], messages[1]);
        assert_ne!(messages[1], messages[2]);
    }

    #[test]
    fn test_setup_error_display() {
        let err = SetupError::DuplicateEndpoint("garage".to_string());
        assert_eq!(err.to_string(), "webhook id 'garage' already exists");
    }

    #[test]
    fn test_host_error_display() {
        let err = HostError::MethodNotAllowed {
            endpoint_id: "garage".to_string(),
            method: "GET".to_string(),
        };
        assert_eq!(err.to_string(), "method GET not allowed for webhook garage");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");

        let err = RepositoryError::Corrupt("front_door".to_string());
        assert_eq!(err.to_string(), "corrupt record: front_door");
    }
}
