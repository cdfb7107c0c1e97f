//! Event bus for fired webhooks.
//!
//! Provides an `EventBus` that distributes `WebhookEvent` messages to all
//! subscribers via a `tokio::sync::broadcast` channel.

pub mod bus;

pub use bus::EventBus;
