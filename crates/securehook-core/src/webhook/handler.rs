//! Per-endpoint webhook request handler.
//!
//! Runs the request state machine
//! `Received -> Authenticating -> {Rejected | Dispatching} -> Responded`:
//! the verifier runs first and the dispatcher only runs once it succeeds.
//! Every fault on this path, including a panic, is contained here and
//! becomes a 500 with an empty body.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;

use securehook_types::error::WebhookFault;
use securehook_types::registration::{EndpointId, EndpointRegistration};
use securehook_types::response::WebhookResponse;

use crate::auth::CredentialVerifier;
use crate::webhook::dispatcher::EventDispatcher;
use crate::webhook::request::{BodySource, IncomingRequest};

/// Lifecycle of one webhook request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Received,
    Authenticating,
    Rejected,
    Dispatching,
    Responded,
}

impl RequestState {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(self, next: RequestState) -> bool {
        use RequestState::*;
        matches!(
            (self, next),
            (Received, Authenticating)
                | (Authenticating, Rejected)
                | (Authenticating, Dispatching)
                | (Dispatching, Responded)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RequestState::Rejected | RequestState::Responded)
    }
}

/// Handler bound to a single endpoint registration.
///
/// Holds the registration (and therefore the stored hash) immutably, so one
/// instance is shared across concurrent requests without locking.
#[derive(Debug, Clone)]
pub struct WebhookHandler {
    registration: Arc<EndpointRegistration>,
    verifier: CredentialVerifier,
    dispatcher: EventDispatcher,
}

impl WebhookHandler {
    pub fn new(
        registration: Arc<EndpointRegistration>,
        verifier: CredentialVerifier,
        dispatcher: EventDispatcher,
    ) -> Self {
        Self {
            registration,
            verifier,
            dispatcher,
        }
    }

    pub fn endpoint_id(&self) -> &EndpointId {
        &self.registration.id
    }

    pub fn registration(&self) -> &EndpointRegistration {
        &self.registration
    }

    /// Handle one request. Always produces a response.
    pub async fn handle<B: BodySource>(&self, request: IncomingRequest<B>) -> WebhookResponse {
        let endpoint_id = self.endpoint_id();

        match AssertUnwindSafe(self.process(request)).catch_unwind().await {
            Ok(Ok(response)) => response,
            Ok(Err(fault)) => {
                tracing::error!(
                    endpoint_id = %endpoint_id,
                    error = %fault,
                    "error processing webhook"
                );
                WebhookResponse::server_fault()
            }
            Err(panic) => {
                let fault = WebhookFault::Panicked(panic_message(panic.as_ref()));
                tracing::error!(
                    endpoint_id = %endpoint_id,
                    error = %fault,
                    "error processing webhook"
                );
                WebhookResponse::server_fault()
            }
        }
    }

    async fn process<B: BodySource>(
        &self,
        request: IncomingRequest<B>,
    ) -> Result<WebhookResponse, WebhookFault> {
        let endpoint_id = self.endpoint_id();
        let mut state = RequestState::Received;

        advance(&mut state, RequestState::Authenticating, endpoint_id);
        if let Err(failure) = self
            .verifier
            .verify(&request.headers, &self.registration.credential_hash)
        {
            tracing::warn!(
                endpoint_id = %endpoint_id,
                reason = %failure,
                "webhook authentication failed"
            );
            advance(&mut state, RequestState::Rejected, endpoint_id);
            return Ok(WebhookResponse::unauthorized());
        }

        advance(&mut state, RequestState::Dispatching, endpoint_id);
        let body = request.body.read().await?;
        self.dispatcher.dispatch(endpoint_id, body.as_deref());

        advance(&mut state, RequestState::Responded, endpoint_id);
        Ok(WebhookResponse::ok())
    }
}

fn advance(state: &mut RequestState, next: RequestState, endpoint_id: &EndpointId) {
    debug_assert!(
        state.can_transition_to(next),
        "illegal webhook state transition {state:?} -> {next:?}"
    );
    tracing::trace!(endpoint_id = %endpoint_id, from = ?state, to = ?next, "webhook state");
    *state = next;
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
