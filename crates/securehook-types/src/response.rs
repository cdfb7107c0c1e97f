/// Wire response of the webhook handler.
///
/// Only three shapes exist; none of them carries detail about why a
/// request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: &'static str,
}

impl WebhookResponse {
    /// 200 "OK": the event was fired.
    pub const fn ok() -> Self {
        Self { status: 200, body: "OK" }
    }

    /// 401 "Unauthorized": any authentication failure.
    pub const fn unauthorized() -> Self {
        Self {
            status: 401,
            body: "Unauthorized",
        }
    }

    /// 500 with an empty body: any unexpected fault.
    pub const fn server_fault() -> Self {
        Self { status: 500, body: "" }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}
