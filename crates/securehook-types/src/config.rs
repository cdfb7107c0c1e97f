//! Server configuration types for SecureHook.
//!
//! `ServerConfig` represents `config.toml` in the data directory. Every
//! field has a default so an empty or missing file is valid.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the webhook server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest request body the server will read, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Capacity of the broadcast channel behind the event bus.
    #[serde(default = "default_event_bus_capacity")]
    pub event_bus_capacity: usize,

    /// Seconds between re-syncs of the routing table with storage.
    /// `0` disables the periodic re-sync; SIGHUP still triggers one.
    #[serde(default = "default_sync_interval_secs")]
    pub sync_interval_secs: u64,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Bridge tracing spans to OpenTelemetry (stdout exporter).
    #[serde(default)]
    pub otel: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8123
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

fn default_event_bus_capacity() -> usize {
    1024
}

fn default_sync_interval_secs() -> u64 {
    2
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
            event_bus_capacity: default_event_bus_capacity(),
            sync_interval_secs: default_sync_interval_secs(),
            log_format: LogFormat::default(),
            otel: false,
        }
    }
}

/// Output format of the `fmt` tracing layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
