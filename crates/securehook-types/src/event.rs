//! Event types published on the SecureHook event bus.
//!
//! `WebhookEvent` is emitted once per authenticated webhook request. It is
//! Clone + Send + Sync for use with tokio broadcast channels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Domain prefix for everything this integration publishes.
pub const DOMAIN: &str = "secure_webhook";

/// Event type of a fired webhook (`"<domain>_event"`).
pub const WEBHOOK_EVENT_TYPE: &str = "secure_webhook_event";

/// Data carried by a fired webhook event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Identifier of the endpoint that received the request.
    pub endpoint_id: String,
    /// Parsed JSON object from the request body, or empty.
    pub data: Map<String, Value>,
}

/// A named, payload-carrying notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub event_type: String,
    pub payload: WebhookPayload,
    pub fired_at: DateTime<Utc>,
}

impl WebhookEvent {
    /// Build a `secure_webhook_event` for the given endpoint.
    pub fn fired(endpoint_id: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            event_type: WEBHOOK_EVENT_TYPE.to_string(),
            payload: WebhookPayload {
                endpoint_id: endpoint_id.into(),
                data,
            },
            fired_at: Utc::now(),
        }
    }
}
