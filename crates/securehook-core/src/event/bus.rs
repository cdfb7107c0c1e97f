//! Broadcast event bus for distributing `WebhookEvent` to subscribers.
//!
//! Built on `tokio::sync::broadcast`. Publishing never waits for
//! subscribers, and publishing with no subscribers is a no-op.

use securehook_types::event::WebhookEvent;
use tokio::sync::broadcast;

/// Multi-consumer bus for fired webhook events.
///
/// Cloning the bus clones the sender, so every handler can publish onto the
/// same channel.
pub struct EventBus {
    sender: broadcast::Sender<WebhookEvent>,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create a new subscriber that will receive all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<WebhookEvent> {
        self.sender.subscribe()
    }

    /// Fire-and-forget publish to all current subscribers.
    ///
    /// If there are no subscribers, the event is silently dropped.
    pub fn publish(&self, event: WebhookEvent) {
        let _ = self.sender.send(event);
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("receiver_count", &self.sender.receiver_count())
            .finish()
    }
}
