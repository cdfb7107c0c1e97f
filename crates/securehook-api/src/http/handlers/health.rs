//! Liveness probe.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::http::router::RouterState;

/// `GET /health`: status plus the number of registered endpoints.
pub async fn health(State(state): State<RouterState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": state.registry.len(),
    }))
}
