//! `/api/webhook/{endpoint_id}`: hands requests to the registered handler.
//!
//! The router accepts every method here; the registry decides between 404,
//! 405 and dispatching to the endpoint's handler.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::Instrument;
use uuid::Uuid;

use securehook_core::webhook::request::{BodySource, IncomingRequest};
use securehook_types::error::WebhookFault;
use securehook_types::request::RequestHeaders;
use securehook_types::response::WebhookResponse;

use crate::http::error::AppError;
use crate::http::router::RouterState;

/// Request body read lazily and capped at `limit` bytes.
pub struct LimitedBody {
    body: Body,
    limit: usize,
}

impl LimitedBody {
    pub fn new(body: Body, limit: usize) -> Self {
        Self { body, limit }
    }
}

impl BodySource for LimitedBody {
    async fn read(self) -> Result<Option<Vec<u8>>, WebhookFault> {
        let bytes = axum::body::to_bytes(self.body, self.limit)
            .await
            .map_err(|e| WebhookFault::BodyRead(e.to_string()))?;
        Ok((!bytes.is_empty()).then(|| bytes.to_vec()))
    }
}

/// Copy HTTP headers into the core representation.
///
/// Values that are not valid UTF-8 are converted lossily; they can never
/// match a `Bearer` credential anyway.
pub fn request_headers(headers: &HeaderMap) -> RequestHeaders {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

pub fn into_http(response: WebhookResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, response.body).into_response()
}

pub async fn receive_webhook(
    State(state): State<RouterState>,
    Path(endpoint_id): Path<String>,
    method: Method,
    headers: HeaderMap,
    body: Body,
) -> Result<Response, AppError> {
    let handler = state.registry.lookup(&endpoint_id, method.as_str())?;

    let span = tracing::info_span!(
        "webhook",
        request_id = %Uuid::now_v7(),
        endpoint_id = %endpoint_id,
        method = %method,
    );
    let request = IncomingRequest::new(
        request_headers(&headers),
        LimitedBody::new(body, state.max_body_bytes),
    );

    let response = handler.handle(request).instrument(span).await;
    Ok(into_http(response))
}
