//! Mapping of routing failures to HTTP responses.
//!
//! Failures inside a registered handler never reach this type; the handler
//! always produces its own 200/401/500 response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use securehook_types::error::HostError;

/// Errors raised before a request reaches a webhook handler.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Host(#[from] HostError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Host(HostError::NotRegistered(_)) => StatusCode::NOT_FOUND,
            AppError::Host(HostError::MethodNotAllowed { .. }) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Host(HostError::AlreadyRegistered(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "webhook routing failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "webhook request not routed");
        }
        // Empty body: nothing about registered ids leaks to the caller.
        status.into_response()
    }
}
