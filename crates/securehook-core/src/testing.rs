//! In-memory fakes shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sha2::{Digest, Sha256};

use securehook_types::error::{HostError, RepositoryError};
use securehook_types::registration::{EndpointId, EndpointRegistration, WebhookMethod};

use crate::repository::registration::RegistrationRepository;
use crate::service::hash::CredentialHasher;
use crate::service::token::TokenGenerator;
use crate::webhook::handler::WebhookHandler;
use crate::webhook::host::WebhookHost;

pub struct TestSha256;

impl CredentialHasher for TestSha256 {
    fn hash_credential(&self, credential: &str) -> String {
        format!("{:x}", Sha256::digest(credential.as_bytes()))
    }
}

pub struct FixedTokens(pub &'static str);

impl TokenGenerator for FixedTokens {
    fn generate(&self) -> String {
        self.0.to_string()
    }
}

#[derive(Default)]
pub struct MemoryRepository {
    rows: Mutex<Vec<EndpointRegistration>>,
}

impl RegistrationRepository for MemoryRepository {
    async fn create(&self, registration: &EndpointRegistration) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|r| r.id == registration.id) {
            return Err(RepositoryError::Conflict(registration.id.to_string()));
        }
        rows.push(registration.clone());
        Ok(())
    }

    async fn get(&self, id: &EndpointId) -> Result<Option<EndpointRegistration>, RepositoryError> {
        Ok(self.rows.lock().unwrap().iter().find(|r| &r.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<EndpointRegistration>, RepositoryError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn delete(&self, id: &EndpointId) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| &r.id != id);
        Ok(rows.len() != before)
    }
}

pub struct Registered {
    pub name: String,
    pub handler: Arc<WebhookHandler>,
    pub methods: Vec<WebhookMethod>,
}

/// Host that records registrations instead of routing.
#[derive(Default)]
pub struct RecordingHost {
    pub entries: Mutex<HashMap<String, Registered>>,
}

impl RecordingHost {
    pub fn contains(&self, id: &str) -> bool {
        self.entries.lock().unwrap().contains_key(id)
    }
}

impl WebhookHost for RecordingHost {
    fn register(
        &self,
        name: &str,
        endpoint_id: &EndpointId,
        handler: Arc<WebhookHandler>,
        allowed_methods: &[WebhookMethod],
    ) -> Result<(), HostError> {
        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(endpoint_id.as_str()) {
            return Err(HostError::AlreadyRegistered(endpoint_id.to_string()));
        }
        entries.insert(
            endpoint_id.to_string(),
            Registered {
                name: name.to_string(),
                handler,
                methods: allowed_methods.to_vec(),
            },
        );
        Ok(())
    }

    fn unregister(&self, endpoint_id: &EndpointId) -> bool {
        self.entries
            .lock()
            .unwrap()
            .remove(endpoint_id.as_str())
            .is_some()
    }

    fn handlers(&self) -> Vec<Arc<WebhookHandler>> {
        self.entries
            .lock()
            .unwrap()
            .values()
            .map(|entry| Arc::clone(&entry.handler))
            .collect()
    }
}
