//! Observability setup for SecureHook: structured logging with optional
//! OpenTelemetry span export.

pub mod tracing_setup;

pub use tracing_setup::{LogConfig, init_tracing, shutdown_tracing};
