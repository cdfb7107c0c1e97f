//! HTTP layer: the webhook route and a health probe.

pub mod error;
pub mod handlers;
pub mod router;
