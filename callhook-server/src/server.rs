//! Axum server setup and router configuration.

use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Build the main application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(crate::api::router())
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
    handlers: Vec<&'static str>,
}

/// Returns OK while the server runs, along with the active handlers.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.settings.environment.to_string(),
        handlers: state.service.handler_names(),
    })
}

/// Run the server with graceful shutdown support.
pub async fn run_server(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use callhook_core::config::Settings;
    use callhook_core::handlers::{CallEventHandler, HandlerError};
    use callhook_core::processors::CallWebhookService;
    use callhook_sdk::objects::{CallEvent, DispatchResult, DispatchStatus};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<CallEvent>>,
    }

    struct RecordingHandler(Arc<Recorder>);

    #[async_trait]
    impl CallEventHandler for RecordingHandler {
        fn name(&self) -> &'static str {
            "RecordingHandler"
        }

        async fn handle(&self, event: &CallEvent) -> Result<(), HandlerError> {
            self.0.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    struct BrokenHandler;

    #[async_trait]
    impl CallEventHandler for BrokenHandler {
        fn name(&self) -> &'static str {
            "BrokenHandler"
        }

        async fn handle(&self, _event: &CallEvent) -> Result<(), HandlerError> {
            Err(HandlerError::Other("downstream unavailable".to_string()))
        }
    }

    struct PanickingHandler;

    #[async_trait]
    impl CallEventHandler for PanickingHandler {
        fn name(&self) -> &'static str {
            "PanickingHandler"
        }

        async fn handle(&self, event: &CallEvent) -> Result<(), HandlerError> {
            let digits: Vec<char> = event.call_id().chars().collect();
            let _area_code = digits[10];
            Ok(())
        }
    }

    fn router_with(handlers: Vec<Box<dyn CallEventHandler>>) -> Router {
        let state = AppState::new(
            Arc::new(Settings::default()),
            Arc::new(CallWebhookService::with_handlers(handlers)),
        );
        build_router(state)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_result(response: axum::response::Response) -> DispatchResult {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_call_started_is_processed() {
        let recorder = Arc::new(Recorder::default());
        let router = router_with(vec![Box::new(RecordingHandler(recorder.clone()))]);

        let response = router
            .oneshot(post_json("/webhooks/calls/started", r#"{"call_id":"c1"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let result = read_result(response).await;
        assert_eq!(result.status, DispatchStatus::Processed);
        assert!(result.message.contains("call_started"));

        let events = recorder.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].call_id(), "c1");
    }

    #[tokio::test]
    async fn test_tagged_call_ended_is_processed() {
        let recorder = Arc::new(Recorder::default());
        let router = router_with(vec![Box::new(RecordingHandler(recorder.clone()))]);

        let body = r#"{"event_type":"call_ended","payload":{"call_id":"c2","end_reason":"hangup"}}"#;
        let response = router
            .oneshot(post_json("/webhooks/calls", body))
            .await
            .unwrap();

        let result = read_result(response).await;
        assert_eq!(result.status, DispatchStatus::Processed);
        assert!(result.message.contains("call_ended"));
        assert!(matches!(
            recorder.events.lock().unwrap().as_slice(),
            [CallEvent::CallEnded(p)] if p.end_reason.as_deref() == Some("hangup")
        ));
    }

    #[tokio::test]
    async fn test_handler_failure_is_hidden_from_sender() {
        let recorder = Arc::new(Recorder::default());
        let router = router_with(vec![
            Box::new(BrokenHandler),
            Box::new(RecordingHandler(recorder.clone())),
        ]);

        let response = router
            .oneshot(post_json("/webhooks/calls/ended", r#"{"call_id":"c3"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_result(response).await.status, DispatchStatus::Processed);
        assert_eq!(recorder.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_handler_panic_still_acknowledged() {
        let recorder = Arc::new(Recorder::default());
        let router = router_with(vec![
            Box::new(PanickingHandler),
            Box::new(RecordingHandler(recorder.clone())),
        ]);

        let response = router
            .oneshot(post_json("/webhooks/calls/started", r#"{"call_id":"c7"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_result(response).await.status, DispatchStatus::Processed);
        assert_eq!(recorder.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_handlers_is_skipped() {
        let router = router_with(vec![]);
        let response = router
            .oneshot(post_json("/webhooks/calls/started", r#"{"call_id":"c4"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_result(response).await.status, DispatchStatus::Skipped);
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let recorder = Arc::new(Recorder::default());
        let router = router_with(vec![Box::new(RecordingHandler(recorder.clone()))]);

        let response = router
            .oneshot(post_json("/webhooks/calls/started", r#"{"started_at":1}"#))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
        assert!(recorder.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_health_lists_handlers() {
        let recorder = Arc::new(Recorder::default());
        let router = router_with(vec![Box::new(RecordingHandler(recorder))]);

        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["environment"], "local");
        assert_eq!(body["handlers"], serde_json::json!(["RecordingHandler"]));
    }
}
