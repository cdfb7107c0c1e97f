//! Endpoint setup service.
//!
//! Provisioning an endpoint:
//! 1. Normalizes the requested id into a slug
//! 2. Rejects ids that already exist
//! 3. Uses the supplied token or generates one
//! 4. Persists only the token digest
//!
//! The raw token is handed back exactly once, wrapped in `SecretString`.

use secrecy::{ExposeSecret, SecretString};

use securehook_types::error::{RepositoryError, SetupError};
use securehook_types::registration::{CredentialHash, EndpointId, EndpointRegistration};

use crate::repository::registration::RegistrationRepository;
use crate::service::hash::CredentialHasher;
use crate::service::token::TokenGenerator;

/// Id proposed by interactive setup when the user has not typed one.
pub const DEFAULT_ENDPOINT_ID: &str = "my_secure_endpoint";

/// Input to [`SetupService::create_endpoint`].
#[derive(Debug)]
pub struct SetupRequest {
    /// Free-form id; slugified before use.
    pub endpoint_id: String,
    /// Token to provision. `None` generates a fresh one.
    pub token: Option<SecretString>,
}

/// Result of a successful setup: the stored registration plus the raw token.
#[derive(Debug)]
pub struct ProvisionedEndpoint {
    pub registration: EndpointRegistration,
    pub token: SecretString,
}

/// Service orchestrating endpoint provisioning and teardown.
///
/// Generic over repository, hasher and token source so securehook-core never
/// depends on securehook-infra.
pub struct SetupService<R: RegistrationRepository, H: CredentialHasher, G: TokenGenerator> {
    repo: R,
    hasher: H,
    tokens: G,
}

impl<R: RegistrationRepository, H: CredentialHasher, G: TokenGenerator> SetupService<R, H, G> {
    pub fn new(repo: R, hasher: H, tokens: G) -> Self {
        Self {
            repo,
            hasher,
            tokens,
        }
    }

    /// A freshly generated token to offer as the default in prompts.
    pub fn suggest_token(&self) -> SecretString {
        SecretString::from(self.tokens.generate())
    }

    /// Provision a new endpoint.
    pub async fn create_endpoint(
        &self,
        request: SetupRequest,
    ) -> Result<ProvisionedEndpoint, SetupError> {
        let id = EndpointId::from_input(&request.endpoint_id).ok_or(SetupError::InvalidSlug)?;

        if self.repo.get(&id).await.map_err(storage_error)?.is_some() {
            return Err(SetupError::DuplicateEndpoint(id.to_string()));
        }

        let token = match request.token {
            Some(token) if token.expose_secret().is_empty() => return Err(SetupError::EmptyToken),
            Some(token) => token,
            None => self.suggest_token(),
        };

        let digest = self.hasher.hash_credential(token.expose_secret());
        let registration = EndpointRegistration::new(id, CredentialHash::from_hex(&digest)?);

        self.repo
            .create(&registration)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    SetupError::DuplicateEndpoint(registration.id.to_string())
                }
                other => storage_error(other),
            })?;

        tracing::info!(endpoint_id = %registration.id, "webhook endpoint created");

        Ok(ProvisionedEndpoint {
            registration,
            token,
        })
    }

    /// Look up an endpoint by (unnormalized) id.
    pub async fn get_endpoint(&self, endpoint_id: &str) -> Result<EndpointRegistration, SetupError> {
        let id = EndpointId::from_input(endpoint_id)
            .ok_or_else(|| SetupError::NotFound(endpoint_id.to_string()))?;
        self.repo
            .get(&id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| SetupError::NotFound(id.to_string()))
    }

    pub async fn list_endpoints(&self) -> Result<Vec<EndpointRegistration>, SetupError> {
        self.repo.list().await.map_err(storage_error)
    }

    /// Remove an endpoint's stored credential. Returns the removed registration.
    pub async fn delete_endpoint(&self, endpoint_id: &str) -> Result<EndpointRegistration, SetupError> {
        let registration = self.get_endpoint(endpoint_id).await?;
        let removed = self
            .repo
            .delete(&registration.id)
            .await
            .map_err(storage_error)?;
        if !removed {
            return Err(SetupError::NotFound(registration.id.to_string()));
        }

        tracing::info!(endpoint_id = %registration.id, "webhook endpoint deleted");
        Ok(registration)
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }
}

fn storage_error(e: RepositoryError) -> SetupError {
    SetupError::StorageError(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedTokens, MemoryRepository, TestSha256};

    fn service() -> SetupService<MemoryRepository, TestSha256, FixedTokens> {
        SetupService::new(MemoryRepository::default(), TestSha256, FixedTokens("generated_token"))
    }

    fn request(id: &str, token: Option<&str>) -> SetupRequest {
        SetupRequest {
            endpoint_id: id.to_string(),
            token: token.map(|t| SecretString::from(t.to_string())),
        }
    }

    #[tokio::test]
    async fn test_create_slugifies_and_hashes() {
        let service = service();
        let provisioned = service
            .create_endpoint(request("Test Webhook ID", Some("test_token")))
            .await
            .unwrap();

        assert_eq!(provisioned.registration.id.as_str(), "test_webhook_id");
        assert_eq!(provisioned.registration.title, "Webhook: test_webhook_id");
        assert_eq!(provisioned.token.expose_secret(), "test_token");
        assert_eq!(
            provisioned.registration.credential_hash.expose_hex(),
            TestSha256.hash_credential("test_token")
        );

        let stored = service.get_endpoint("test_webhook_id").await.unwrap();
        assert_eq!(stored, provisioned.registration);
    }

    #[tokio::test]
    async fn test_raw_token_is_never_stored() {
        let service = service();
        service
            .create_endpoint(request("garage", Some("super-secret-token")))
            .await
            .unwrap();

        let stored = service.get_endpoint("garage").await.unwrap();
        assert_ne!(stored.credential_hash.expose_hex(), "super-secret-token");
        assert!(!format!("{stored:?}").contains("super-secret-token"));
    }

    #[tokio::test]
    async fn test_generates_token_when_absent() {
        let service = service();
        let provisioned = service.create_endpoint(request("garage", None)).await.unwrap();
        assert_eq!(provisioned.token.expose_secret(), "generated_token");
        assert_eq!(
            provisioned.registration.credential_hash.expose_hex(),
            TestSha256.hash_credential("generated_token")
        );
    }

    #[tokio::test]
    async fn test_invalid_slug_rejected() {
        let result = service().create_endpoint(request("!!!", Some("t"))).await;
        assert!(matches!(result, Err(SetupError::InvalidSlug)));
    }

    #[tokio::test]
    async fn test_duplicate_rejected_after_normalization() {
        let service = service();
        service
            .create_endpoint(request("front_door", Some("a")))
            .await
            .unwrap();

        let result = service.create_endpoint(request("Front Door", Some("b"))).await;
        match result {
            Err(SetupError::DuplicateEndpoint(id)) => assert_eq!(id, "front_door"),
            other => panic!("expected duplicate error, got {other:?}"),
        }
        assert_eq!(service.list_endpoints().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_token_rejected() {
        let result = service().create_endpoint(request("garage", Some(""))).await;
        assert!(matches!(result, Err(SetupError::EmptyToken)));
    }

    #[tokio::test]
    async fn test_delete_endpoint() {
        let service = service();
        service.create_endpoint(request("garage", Some("t"))).await.unwrap();

        let removed = service.delete_endpoint("garage").await.unwrap();
        assert_eq!(removed.id.as_str(), "garage");
        assert!(service.list_endpoints().await.unwrap().is_empty());

        let again = service.delete_endpoint("garage").await;
        assert!(matches!(again, Err(SetupError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_unknown_endpoint() {
        let result = service().get_endpoint("nope").await;
        assert!(matches!(result, Err(SetupError::NotFound(_))));
    }

    #[test]
    fn test_default_endpoint_id_is_a_slug() {
        assert_eq!(
            EndpointId::from_input(DEFAULT_ENDPOINT_ID).unwrap().as_str(),
            DEFAULT_ENDPOINT_ID
        );
    }
}
