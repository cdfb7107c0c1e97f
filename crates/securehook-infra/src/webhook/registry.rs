//! `DashMap`-backed routing table from endpoint id to handler.
//!
//! Implements `WebhookHost` from `securehook-core`. The HTTP layer resolves
//! each request through [`WebhookRegistry::lookup`]; registration and removal
//! happen at setup/unload time and never block in-flight lookups.

use std::str::FromStr;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use securehook_core::webhook::handler::WebhookHandler;
use securehook_core::webhook::host::WebhookHost;
use securehook_types::error::HostError;
use securehook_types::registration::{EndpointId, WebhookMethod};

/// One entry in the routing table.
#[derive(Debug, Clone)]
pub struct RegisteredWebhook {
    pub name: String,
    pub handler: Arc<WebhookHandler>,
    pub allowed_methods: Vec<WebhookMethod>,
}

/// Thread-safe registry of webhook handlers keyed by endpoint id.
///
/// Cloning shares the underlying table.
#[derive(Clone, Default)]
pub struct WebhookRegistry {
    routes: Arc<DashMap<String, RegisteredWebhook>>,
}

impl WebhookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the handler for a request to `endpoint_id` with `method`.
    ///
    /// - Unknown id: [`HostError::NotRegistered`]
    /// - Method outside the registered set: [`HostError::MethodNotAllowed`]
    pub fn lookup(&self, endpoint_id: &str, method: &str) -> Result<Arc<WebhookHandler>, HostError> {
        let entry = self
            .routes
            .get(endpoint_id)
            .ok_or_else(|| HostError::NotRegistered(endpoint_id.to_string()))?;

        let allowed = WebhookMethod::from_str(method)
            .map(|m| entry.allowed_methods.contains(&m))
            .unwrap_or(false);
        if !allowed {
            return Err(HostError::MethodNotAllowed {
                endpoint_id: endpoint_id.to_string(),
                method: method.to_string(),
            });
        }

        Ok(Arc::clone(&entry.handler))
    }

    /// Allowed methods for `endpoint_id`, if registered.
    pub fn allowed_methods(&self, endpoint_id: &str) -> Option<Vec<WebhookMethod>> {
        self.routes
            .get(endpoint_id)
            .map(|entry| entry.allowed_methods.clone())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Registered endpoint ids, sorted.
    pub fn endpoint_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.routes.iter().map(|r| r.key().clone()).collect();
        ids.sort();
        ids
    }
}

impl WebhookHost for WebhookRegistry {
    fn register(
        &self,
        name: &str,
        endpoint_id: &EndpointId,
        handler: Arc<WebhookHandler>,
        allowed_methods: &[WebhookMethod],
    ) -> Result<(), HostError> {
        match self.routes.entry(endpoint_id.to_string()) {
            Entry::Occupied(_) => Err(HostError::AlreadyRegistered(endpoint_id.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(RegisteredWebhook {
                    name: name.to_string(),
                    handler,
                    allowed_methods: allowed_methods.to_vec(),
                });
                tracing::debug!(endpoint_id = %endpoint_id, name, "webhook route added");
                Ok(())
            }
        }
    }

    fn unregister(&self, endpoint_id: &EndpointId) -> bool {
        self.routes.remove(endpoint_id.as_str()).is_some()
    }

    fn handlers(&self) -> Vec<Arc<WebhookHandler>> {
        self.routes
            .iter()
            .map(|entry| Arc::clone(&entry.handler))
            .collect()
    }
}

impl std::fmt::Debug for WebhookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookRegistry")
            .field("endpoints", &self.endpoint_ids())
            .finish()
    }
}
