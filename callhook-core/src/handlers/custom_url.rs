//! Custom HTTP endpoint.

use super::{CallEventHandler, HandlerError, http::post_json};
use async_trait::async_trait;
use callhook_sdk::objects::CallEvent;
use tracing::debug;
use url::Url;

/// Header carrying the event type, so receivers can route before parsing.
pub const EVENT_HEADER: &str = "X-Callhook-Event";

/// Forwards the tagged event (`{"event_type", "payload"}`) as-is.
pub struct CustomUrlHandler {
    http_client: reqwest::Client,
    url: Url,
}

impl CustomUrlHandler {
    pub const NAME: &'static str = "CustomUrlHandler";

    pub fn new(http_client: reqwest::Client, url: Url) -> Self {
        Self { http_client, url }
    }
}

#[async_trait]
impl CallEventHandler for CustomUrlHandler {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn handle(&self, event: &CallEvent) -> Result<(), HandlerError> {
        let event_type = event.event_type();
        post_json(
            &self.http_client,
            &self.url,
            event,
            &[(EVENT_HEADER, event_type.as_str())],
        )
        .await?;
        debug!(url = %self.url, call_id = event.call_id(), "Custom endpoint accepted event");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::HeaderMap, routing::post};
    use callhook_sdk::objects::CallEndedPayload;
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_forwards_tagged_event_with_header() {
        let received: Arc<Mutex<Vec<(Option<String>, Value)>>> = Arc::default();
        let sink = received.clone();
        let router = Router::new().route(
            "/calls",
            post(move |headers: HeaderMap, Json(body): Json<Value>| async move {
                let event_header = headers
                    .get(EVENT_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                sink.lock().unwrap().push((event_header, body));
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let url = Url::parse(&format!("http://{addr}/calls")).unwrap();
        let handler = CustomUrlHandler::new(reqwest::Client::new(), url);
        let mut payload = CallEndedPayload::new("c3");
        payload.duration_seconds = Some(61);
        handler.handle(&CallEvent::CallEnded(payload)).await.unwrap();

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].0.as_deref(), Some("call_ended"));
        assert_eq!(
            received[0].1,
            json!({
                "event_type": "call_ended",
                "payload": {"call_id": "c3", "duration_seconds": 61},
            })
        );
    }
}
