//! Host routing-table port.
//!
//! The host owns the mapping from endpoint id to handler and decides which
//! HTTP methods reach it. The `DashMap`-backed implementation lives in
//! securehook-infra.

use std::sync::Arc;

use securehook_types::error::HostError;
use securehook_types::registration::{EndpointId, WebhookMethod};

use super::handler::WebhookHandler;

/// Routing table that webhook handlers are registered with.
pub trait WebhookHost: Send + Sync {
    /// Register `handler` under `endpoint_id`.
    ///
    /// Fails with [`HostError::AlreadyRegistered`] if the id is taken.
    fn register(
        &self,
        name: &str,
        endpoint_id: &EndpointId,
        handler: Arc<WebhookHandler>,
        allowed_methods: &[WebhookMethod],
    ) -> Result<(), HostError>;

    /// Remove the handler for `endpoint_id`. Returns whether one was registered.
    fn unregister(&self, endpoint_id: &EndpointId) -> bool;

    /// Every handler currently registered, in no particular order.
    fn handlers(&self) -> Vec<Arc<WebhookHandler>>;
}
