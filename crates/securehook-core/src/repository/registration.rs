//! Endpoint registration repository trait definition.

use securehook_types::error::RepositoryError;
use securehook_types::registration::{EndpointId, EndpointRegistration};

/// Repository trait for the credential-hash store.
///
/// Implementations live in securehook-infra (e.g., SqliteRegistrationRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait RegistrationRepository: Send + Sync {
    /// Persist a new registration.
    ///
    /// Returns `RepositoryError::Conflict` if the id already exists.
    fn create(
        &self,
        registration: &EndpointRegistration,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a registration by endpoint id.
    fn get(
        &self,
        id: &EndpointId,
    ) -> impl std::future::Future<Output = Result<Option<EndpointRegistration>, RepositoryError>> + Send;

    /// List all registrations, oldest first.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<EndpointRegistration>, RepositoryError>> + Send;

    /// Delete a registration. Returns whether a row was removed.
    fn delete(
        &self,
        id: &EndpointId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
