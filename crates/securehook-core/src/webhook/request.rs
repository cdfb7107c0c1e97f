//! Incoming request representation handed to the webhook handler.
//!
//! The body is not read up front: the handler pulls it through a
//! [`BodySource`] only after authentication succeeds.

use std::future::Future;

use securehook_types::error::WebhookFault;
use securehook_types::request::RequestHeaders;

/// Deferred access to a request body.
///
/// Implemented by the HTTP layer for its streaming body type. A read error
/// is an unexpected fault, not a parse failure.
pub trait BodySource: Send {
    /// Consume the source, returning the body bytes if there were any.
    fn read(self) -> impl Future<Output = Result<Option<Vec<u8>>, WebhookFault>> + Send;
}

impl BodySource for Option<Vec<u8>> {
    async fn read(self) -> Result<Option<Vec<u8>>, WebhookFault> {
        Ok(self)
    }
}

impl BodySource for Vec<u8> {
    async fn read(self) -> Result<Option<Vec<u8>>, WebhookFault> {
        Ok(Some(self))
    }
}

/// One webhook invocation.
#[derive(Debug)]
pub struct IncomingRequest<B> {
    pub headers: RequestHeaders,
    pub body: B,
}

impl<B: BodySource> IncomingRequest<B> {
    pub fn new(headers: RequestHeaders, body: B) -> Self {
        Self { headers, body }
    }
}
