//! Call event handlers.
//!
//! A handler delivers one call event to one downstream destination:
//!
//! - `ThirdPartyWebhookHandler`: POSTs an envelope to an automation webhook
//! - `DatabaseHandler`: stores the event in the `call_events` table
//! - `CustomUrlHandler`: POSTs the raw event to a custom endpoint
//!
//! Which handlers exist is decided once, from [`Settings`], by
//! [`HandlerKind::select`].

mod custom_url;
mod database;
mod http;
mod third_party;

pub use custom_url::CustomUrlHandler;
pub use database::DatabaseHandler;
pub use http::delivery_client;
pub use third_party::ThirdPartyWebhookHandler;

use crate::config::{Environment, Settings};
use async_trait::async_trait;
use callhook_sdk::objects::CallEvent;
use thiserror::Error;
use tracing::warn;
use url::Url;

/// Errors a handler can report for a single delivery.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Destination answered with a non-success status
    #[error("delivery failed with status {status}: {body}")]
    DeliveryFailed { status: u16, body: String },

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Payload serialization error
    #[error("payload serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Delivers call events to one destination.
///
/// Implementations must be safe to share between concurrent dispatches:
/// they may not keep per-event mutable state.
#[async_trait]
pub trait CallEventHandler: Send + Sync {
    /// Name used to identify the handler in logs.
    fn name(&self) -> &'static str;

    /// Deliver one event.
    async fn handle(&self, event: &CallEvent) -> Result<(), HandlerError>;

    /// Release any resources held by the handler.
    async fn shutdown(&self) {}
}

/// A handler variant that passed selection, carrying its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerKind {
    ThirdParty { url: Url },
    Database { url: String },
    CustomUrl { url: Url },
}

impl HandlerKind {
    /// Decide which handler variants are active.
    ///
    /// Variants are considered in a fixed order: third-party, database,
    /// custom URL. A variant is included only when it is enabled and its
    /// destination is configured. An enabled variant without a destination is
    /// skipped with a warning.
    pub fn select(settings: &Settings) -> Vec<HandlerKind> {
        let toggles = &settings.handlers;
        let mut kinds = Vec::with_capacity(3);

        if toggles.third_party_enabled {
            match &settings.third_party_webhook_url {
                Some(url) => kinds.push(HandlerKind::ThirdParty { url: url.clone() }),
                None => warn!(
                    "Third-party handler is enabled but THIRD_PARTY_WEBHOOK_URL is not set, skipping"
                ),
            }
        }

        if toggles.database_enabled {
            match settings.database_url() {
                Some(url) => kinds.push(HandlerKind::Database {
                    url: url.to_string(),
                }),
                None => warn!("Database handler is enabled but DATABASE_URL is not set, skipping"),
            }
        }

        if toggles.custom_url_enabled {
            match &settings.custom_webhook_url {
                Some(url) => kinds.push(HandlerKind::CustomUrl { url: url.clone() }),
                None => warn!(
                    "Custom URL handler is enabled but CUSTOM_SERVER_WEBHOOK_URL is not set, skipping"
                ),
            }
        }

        kinds
    }

    /// Name of the handler this kind builds.
    pub fn name(&self) -> &'static str {
        match self {
            HandlerKind::ThirdParty { .. } => ThirdPartyWebhookHandler::NAME,
            HandlerKind::Database { .. } => DatabaseHandler::NAME,
            HandlerKind::CustomUrl { .. } => CustomUrlHandler::NAME,
        }
    }

    /// Instantiate the handler.
    ///
    /// HTTP handlers share `http_client` and fail to build without one. The
    /// database handler connects lazily, so it only fails when the
    /// connection string is malformed.
    pub fn build(
        self,
        http_client: Option<&reqwest::Client>,
        environment: Environment,
    ) -> Result<Box<dyn CallEventHandler>, HandlerError> {
        let shared_client = || {
            http_client
                .cloned()
                .ok_or_else(|| HandlerError::Other("no HTTP client available".to_string()))
        };

        Ok(match self {
            HandlerKind::ThirdParty { url } => Box::new(ThirdPartyWebhookHandler::new(
                shared_client()?,
                url,
                environment,
            )),
            HandlerKind::Database { url } => Box::new(DatabaseHandler::connect_lazy(&url)?),
            HandlerKind::CustomUrl { url } => Box::new(CustomUrlHandler::new(shared_client()?, url)),
        })
    }
}
