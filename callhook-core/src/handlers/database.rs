//! Database sink.

use super::{CallEventHandler, HandlerError};
use crate::entities::call_events::InsertCallEvent;
use crate::framework::DatabaseProcessor;
use async_trait::async_trait;
use callhook_sdk::objects::CallEvent;
use kanau::processor::Processor;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

/// Stores every event as a row in `call_events`.
pub struct DatabaseHandler {
    processor: DatabaseProcessor,
}

impl DatabaseHandler {
    pub const NAME: &'static str = "DatabaseHandler";

    /// Create the handler without opening a connection.
    ///
    /// Connections are established on first use, so an unreachable database
    /// surfaces as a per-event delivery failure rather than a startup error.
    pub fn connect_lazy(database_url: &str) -> Result<Self, HandlerError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy(database_url)?;
        Ok(Self {
            processor: DatabaseProcessor { pool },
        })
    }
}

#[async_trait]
impl CallEventHandler for DatabaseHandler {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn handle(&self, event: &CallEvent) -> Result<(), HandlerError> {
        let id = Uuid::now_v7();
        let insert = InsertCallEvent {
            id,
            event_type: event.event_type().as_str(),
            call_id: event.call_id().to_string(),
            payload: serde_json::to_value(event.payload())?,
        };

        self.processor.process(insert).await?;
        debug!(%id, call_id = event.call_id(), "Call event stored");
        Ok(())
    }

    async fn shutdown(&self) {
        info!("Closing database handler connections");
        self.processor.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_malformed_url_is_rejected() {
        let result = DatabaseHandler::connect_lazy("definitely not a url");
        assert!(matches!(result, Err(HandlerError::Database(_))));
    }

    #[tokio::test]
    async fn test_valid_url_does_not_connect() {
        // Nothing listens on this port; creation must still succeed.
        let handler = DatabaseHandler::connect_lazy("postgres://callhook@127.0.0.1:1/calls");
        assert!(handler.is_ok());
    }
}
