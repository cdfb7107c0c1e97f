//! Attaching endpoint registrations to a webhook host.
//!
//! `setup_entry` builds a [`WebhookHandler`] for a registration and registers
//! it with the host; `unload_entry` removes it. Both report success as a bool
//! so a failed registration never takes the rest of the process down.
//! `sync` reconciles the host with storage after the fact, which is how a
//! running server picks up endpoints created or deleted by another process.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use securehook_types::error::RepositoryError;
use securehook_types::registration::{EndpointId, EndpointRegistration, WebhookMethod};

use crate::auth::CredentialVerifier;
use crate::event::EventBus;
use crate::repository::registration::RegistrationRepository;
use crate::service::hash::CredentialHasher;
use crate::webhook::dispatcher::EventDispatcher;
use crate::webhook::handler::WebhookHandler;
use crate::webhook::host::WebhookHost;

/// Display name handlers are registered under.
pub const INTEGRATION_NAME: &str = "Secure Webhook";

/// Changes applied by one [`EndpointLifecycle::sync`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: usize,
    pub removed: usize,
}

impl SyncReport {
    pub fn is_unchanged(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

pub struct EndpointLifecycle<W: WebhookHost> {
    host: Arc<W>,
    hasher: Arc<dyn CredentialHasher>,
    bus: EventBus,
}

impl<W: WebhookHost> EndpointLifecycle<W> {
    pub fn new(host: Arc<W>, hasher: Arc<dyn CredentialHasher>, bus: EventBus) -> Self {
        Self { host, hasher, bus }
    }

    pub fn host(&self) -> &Arc<W> {
        &self.host
    }

    /// Handler for `registration`, wired to this lifecycle's hasher and bus.
    pub fn build_handler(&self, registration: EndpointRegistration) -> WebhookHandler {
        WebhookHandler::new(
            Arc::new(registration),
            CredentialVerifier::new(Arc::clone(&self.hasher)),
            EventDispatcher::new(self.bus.clone()),
        )
    }

    /// Register a handler for `registration` accepting POST and PUT.
    pub fn setup_entry(&self, registration: EndpointRegistration) -> bool {
        let endpoint_id = registration.id.clone();
        let handler = Arc::new(self.build_handler(registration));

        match self.host.register(
            INTEGRATION_NAME,
            &endpoint_id,
            handler,
            &WebhookMethod::DEFAULT_ALLOWED,
        ) {
            Ok(()) => {
                tracing::info!(endpoint_id = %endpoint_id, "secure webhook registered");
                true
            }
            Err(e) => {
                tracing::warn!(endpoint_id = %endpoint_id, error = %e, "failed to register webhook");
                false
            }
        }
    }

    /// Remove the handler for `endpoint_id`. Returns whether one was registered.
    pub fn unload_entry(&self, endpoint_id: &EndpointId) -> bool {
        let removed = self.host.unregister(endpoint_id);
        if removed {
            tracing::info!(endpoint_id = %endpoint_id, "secure webhook unregistered");
        } else {
            tracing::debug!(endpoint_id = %endpoint_id, "unload for unknown webhook");
        }
        removed
    }

    /// Register every stored endpoint. Returns how many were attached.
    pub async fn load_all<R: RegistrationRepository>(
        &self,
        repo: &R,
    ) -> Result<usize, RepositoryError> {
        let registrations = repo.list().await?;
        let total = registrations.len();
        let loaded = registrations
            .into_iter()
            .filter(|registration| self.setup_entry(registration.clone()))
            .count();

        tracing::info!(loaded, total, "loaded webhook endpoints");
        Ok(loaded)
    }

    /// Reconcile the host's routes with the registrations in `repo`.
    ///
    /// A route whose registration was deleted, or re-created with a different
    /// credential, is unloaded. Every stored registration left without a route
    /// is then set up. On a repository error the host is left untouched.
    pub async fn sync<R: RegistrationRepository>(
        &self,
        repo: &R,
    ) -> Result<SyncReport, RepositoryError> {
        let stored: HashMap<EndpointId, EndpointRegistration> = repo
            .list()
            .await?
            .into_iter()
            .map(|registration| (registration.id.clone(), registration))
            .collect();

        let mut report = SyncReport::default();
        let mut attached = HashSet::new();

        for handler in self.host.handlers() {
            let current = handler.registration();
            let unchanged = stored
                .get(&current.id)
                .is_some_and(|s| s.credential_hash == current.credential_hash);

            if unchanged {
                attached.insert(current.id.clone());
            } else if self.unload_entry(&current.id) {
                report.removed += 1;
            }
        }

        for (id, registration) in stored {
            if !attached.contains(&id) && self.setup_entry(registration) {
                report.added += 1;
            }
        }

        if !report.is_unchanged() {
            tracing::info!(
                added = report.added,
                removed = report.removed,
                "webhook routes synced with storage"
            );
        }
        Ok(report)
    }
}
