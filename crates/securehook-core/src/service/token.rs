//! TokenGenerator trait for issuing new webhook credentials.

/// Source of fresh high-entropy bearer tokens.
///
/// The OS-RNG implementation lives in securehook-infra.
pub trait TokenGenerator: Send + Sync {
    /// Produce a new URL-safe token.
    fn generate(&self) -> String;
}
