//! Axum router: the webhook route, a health probe and request tracing.

use axum::Router;
use axum::routing::{any, get};
use tower_http::trace::TraceLayer;

use securehook_infra::webhook::registry::WebhookRegistry;

use crate::http::handlers;

/// State shared by every route.
#[derive(Clone, Debug)]
pub struct RouterState {
    pub registry: WebhookRegistry,
    pub max_body_bytes: usize,
}

pub fn build_router(state: RouterState) -> Router {
    Router::new()
        .route(
            "/api/webhook/{endpoint_id}",
            any(handlers::webhook::receive_webhook),
        )
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tokio::sync::broadcast;
    use tower::ServiceExt;

    use securehook_core::event::EventBus;
    use securehook_core::service::hash::CredentialHasher;
    use securehook_core::service::lifecycle::EndpointLifecycle;
    use securehook_infra::crypto::hash::Sha256CredentialHasher;
    use securehook_types::event::WebhookEvent;
    use securehook_types::registration::{CredentialHash, EndpointId, EndpointRegistration};

    use super::*;

    const URI: &str = "/api/webhook/test_webhook_id";

    fn app() -> (Router, broadcast::Receiver<WebhookEvent>) {
        let registry = WebhookRegistry::new();
        let bus = EventBus::new(16);
        let rx = bus.subscribe();
        let lifecycle = EndpointLifecycle::new(
            Arc::new(registry.clone()),
            Arc::new(Sha256CredentialHasher),
            bus,
        );

        let registration = EndpointRegistration::new(
            EndpointId::from_input("test_webhook_id").unwrap(),
            CredentialHash::from_hex(&Sha256CredentialHasher.hash_credential("test_token"))
                .unwrap(),
        );
        assert!(lifecycle.setup_entry(registration));

        let router = build_router(RouterState {
            registry,
            max_body_bytes: 1024,
        });
        (router, rx)
    }

    fn request(method: &str, uri: &str, auth: Option<&str>, body: Body) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header("Authorization", auth);
        }
        builder.body(body).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn valid_post_fires_event() {
        let (app, mut rx) = app();
        let response = app
            .oneshot(request(
                "POST",
                URI,
                Some("Bearer test_token"),
                Body::from(r#"{"key":"value"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");

        let event = rx.try_recv().unwrap();
        assert_eq!(event.event_type, "secure_webhook_event");
        assert_eq!(
            serde_json::to_value(&event.payload).unwrap(),
            json!({"endpoint_id": "test_webhook_id", "data": {"key": "value"}})
        );
    }

    #[tokio::test]
    async fn valid_put_is_accepted() {
        let (app, mut rx) = app();
        let response = app
            .oneshot(request("PUT", URI, Some("Bearer test_token"), Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(rx.try_recv().unwrap().payload.data.is_empty());
    }

    #[tokio::test]
    async fn wrong_token_is_unauthorized() {
        let (app, mut rx) = app();
        let response = app
            .oneshot(request("POST", URI, Some("Bearer wrong_token"), Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, "Unauthorized");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let (app, _rx) = app();
        let response = app
            .oneshot(request("POST", URI, None, Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_json_still_fires_with_empty_data() {
        let (app, mut rx) = app();
        let response = app
            .oneshot(request(
                "POST",
                URI,
                Some("Bearer test_token"),
                Body::from("not json"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(Value::Object(rx.try_recv().unwrap().payload.data), json!({}));
    }

    #[tokio::test]
    async fn oversized_body_is_server_fault() {
        let (app, mut rx) = app();
        let response = app
            .oneshot(request(
                "POST",
                URI,
                Some("Bearer test_token"),
                Body::from(vec![b' '; 4096]),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unknown_endpoint_is_not_found() {
        let (app, _rx) = app();
        let response = app
            .oneshot(request(
                "POST",
                "/api/webhook/nope",
                Some("Bearer test_token"),
                Body::empty(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "");
    }

    #[tokio::test]
    async fn get_is_method_not_allowed() {
        let (app, mut rx) = app();
        let response = app
            .oneshot(request("GET", URI, Some("Bearer test_token"), Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn health_reports_endpoint_count() {
        let (app, _rx) = app();
        let response = app
            .oneshot(request("GET", "/health", None, Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["endpoints"], 1);
    }
}
