//! Turns an authenticated request body into a published `WebhookEvent`.
//!
//! Payload passthrough is best effort: a body that is absent, empty, not
//! JSON, or JSON but not an object becomes an empty mapping.

use serde_json::{Map, Value};

use securehook_types::error::BodyParseFailure;
use securehook_types::event::WebhookEvent;
use securehook_types::registration::EndpointId;

use crate::event::EventBus;

/// Parse a request body into a JSON object.
///
/// An absent or whitespace-only body is an empty mapping, not a failure.
pub fn parse_payload(body: Option<&[u8]>) -> Result<Map<String, Value>, BodyParseFailure> {
    let bytes = match body {
        Some(bytes) if !bytes.trim_ascii().is_empty() => bytes,
        _ => return Ok(Map::new()),
    };

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(BodyParseFailure::NotAnObject),
        Err(e) => Err(BodyParseFailure::InvalidJson(e.to_string())),
    }
}

/// Publishes exactly one event per call onto the bus.
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    bus: EventBus,
}

impl EventDispatcher {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    /// Build and publish the event for `endpoint_id`. Never fails.
    ///
    /// Returns the published event; the bus has already taken its copy.
    pub fn dispatch(&self, endpoint_id: &EndpointId, body: Option<&[u8]>) -> WebhookEvent {
        let data = parse_payload(body).unwrap_or_else(|failure| {
            tracing::debug!(
                endpoint_id = %endpoint_id,
                reason = %failure,
                "webhook body ignored, firing with empty data"
            );
            Map::new()
        });

        let logged = Value::Object(data.clone());
        tracing::debug!(
            endpoint_id = %endpoint_id,
            data = %logged,
            "secure webhook triggered"
        );

        let event = WebhookEvent::fired(endpoint_id.as_str(), data);
        self.bus.publish(event.clone());
        event
    }
}
