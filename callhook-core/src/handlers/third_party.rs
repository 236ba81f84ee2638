//! Third-party automation webhook (Make.com style).
//!
//! Sends an envelope so that scenario builders can route on `event_type`
//! without inspecting the payload:
//!
//! ```json
//! {"event_type": "call_started", "environment": "production", "sent_at": 1700000000, "data": {...}}
//! ```

use super::{CallEventHandler, HandlerError, http::post_json};
use crate::config::Environment;
use async_trait::async_trait;
use callhook_sdk::objects::{CallEvent, CallEventType, CallPayloadRef};
use serde::Serialize;
use tracing::debug;
use url::Url;

#[derive(Serialize)]
struct Envelope<'a> {
    event_type: CallEventType,
    environment: Environment,
    sent_at: i64,
    data: CallPayloadRef<'a>,
}

pub struct ThirdPartyWebhookHandler {
    http_client: reqwest::Client,
    url: Url,
    environment: Environment,
}

impl ThirdPartyWebhookHandler {
    pub const NAME: &'static str = "ThirdPartyWebhookHandler";

    pub fn new(http_client: reqwest::Client, url: Url, environment: Environment) -> Self {
        Self {
            http_client,
            url,
            environment,
        }
    }
}

#[async_trait]
impl CallEventHandler for ThirdPartyWebhookHandler {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn handle(&self, event: &CallEvent) -> Result<(), HandlerError> {
        let envelope = Envelope {
            event_type: event.event_type(),
            environment: self.environment,
            sent_at: time::OffsetDateTime::now_utc().unix_timestamp(),
            data: event.payload(),
        };

        post_json(&self.http_client, &self.url, &envelope, &[]).await?;
        debug!(url = %self.url, call_id = event.call_id(), "Third-party webhook accepted event");
        Ok(())
    }
}
