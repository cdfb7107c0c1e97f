//! The authenticated webhook request path.
//!
//! - `request` -- incoming request and deferred body access
//! - `dispatcher` -- body parsing and event publication
//! - `handler` -- per-endpoint orchestration and fault containment
//! - `host` -- the routing table a handler is registered with

pub mod dispatcher;
pub mod handler;
pub mod host;
pub mod request;

pub use dispatcher::{EventDispatcher, parse_payload};
pub use handler::{RequestState, WebhookHandler};
pub use host::WebhookHost;
pub use request::{BodySource, IncomingRequest};
