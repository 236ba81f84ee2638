//! CallWebhookService processor.
//!
//! The CallWebhookService is responsible for:
//! - Building the active handler list from [`Settings`], once
//! - Delivering each `CallEvent` to every handler, sequentially, in the
//!   order the handlers were built
//! - Containing handler failures: a failed or panicking handler is logged
//!   and the next one still runs. Nothing is retried.
//!
//! The caller always gets a [`DispatchResult`]; handler errors never reach it.

use crate::config::Settings;
use crate::handlers::{CallEventHandler, HandlerError, HandlerKind, delivery_client};
use callhook_sdk::objects::{CallEvent, DispatchResult};
use futures_util::FutureExt;
use kanau::processor::Processor;
use std::any::Any;
use std::convert::Infallible;
use std::panic::AssertUnwindSafe;
use tracing::{error, info, warn};

/// Result of delivering one event to one handler.
#[derive(Debug)]
pub struct HandlerOutcome {
    pub handler: &'static str,
    pub result: Result<(), HandlerError>,
}

/// Fans call events out to the configured handlers.
pub struct CallWebhookService {
    handlers: Vec<Box<dyn CallEventHandler>>,
}

impl CallWebhookService {
    /// Build the service from configuration.
    ///
    /// Handlers that are enabled but lack a destination, or whose database
    /// URL is malformed, are skipped with a log line. This never fails: a
    /// service without handlers is valid and skips every event.
    pub fn from_settings(settings: &Settings) -> Self {
        let http_client = match delivery_client(settings.http_timeout) {
            Ok(client) => Some(client),
            Err(e) => {
                error!(error = %e, "Failed to build HTTP client, HTTP handlers will be skipped");
                None
            }
        };

        let handlers = HandlerKind::select(settings)
            .into_iter()
            .filter_map(|kind| {
                let name = kind.name();
                match kind.build(http_client.as_ref(), settings.environment) {
                    Ok(handler) => Some(handler),
                    Err(e) => {
                        error!(handler = name, error = %e, "Failed to create handler, skipping");
                        None
                    }
                }
            })
            .collect();

        Self::with_handlers(handlers)
    }

    /// Build the service from an explicit handler list, kept in order.
    pub fn with_handlers(handlers: Vec<Box<dyn CallEventHandler>>) -> Self {
        if handlers.is_empty() {
            warn!("No call webhook handlers registered, webhook events will be skipped");
        } else {
            let names: Vec<&str> = handlers.iter().map(|h| h.name()).collect();
            info!(
                count = handlers.len(),
                handlers = %names.join(", "),
                "CallWebhookService initialized"
            );
        }
        Self { handlers }
    }

    /// Names of the active handlers, in invocation order.
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Whether the service has no handler to deliver to.
    pub fn is_inert(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Deliver `event` to every handler and acknowledge it.
    ///
    /// Returns `skipped` when there is no handler, `processed` otherwise,
    /// whether or not individual handlers failed.
    pub async fn process_event(&self, event: &CallEvent) -> DispatchResult {
        let event_type = event.event_type();

        if self.handlers.is_empty() {
            info!(%event_type, "No handlers to process call webhook event, skipping");
            return DispatchResult::skipped("No active handlers, event skipped.");
        }

        let outcomes = self.dispatch(event).await;
        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();

        info!(
            %event_type,
            succeeded = outcomes.len() - failed,
            failed,
            "Finished processing call webhook event"
        );

        DispatchResult::processed(format!(
            "Call webhook event '{event_type}' processed by the service."
        ))
    }

    /// Invoke each handler in order, one at a time, collecting the outcomes.
    ///
    /// A handler that panics is recorded as a failed outcome.
    #[tracing::instrument(
        skip_all,
        fields(event_type = %event.event_type(), call_id = event.call_id())
    )]
    pub async fn dispatch(&self, event: &CallEvent) -> Vec<HandlerOutcome> {
        let mut outcomes = Vec::with_capacity(self.handlers.len());

        for handler in &self.handlers {
            let name = handler.name();
            info!(handler = name, "Running handler");

            let result = match AssertUnwindSafe(handler.handle(event)).catch_unwind().await {
                Ok(result) => result,
                Err(panic) => Err(HandlerError::Other(format!(
                    "handler panicked: {}",
                    panic_message(&*panic)
                ))),
            };
            match &result {
                Ok(()) => info!(handler = name, "Handler completed"),
                Err(e) => error!(handler = name, error = %e, "Handler failed"),
            }

            outcomes.push(HandlerOutcome {
                handler: name,
                result,
            });
        }

        outcomes
    }

    /// Let handlers release what they hold (database pools).
    pub async fn shutdown(&self) {
        for handler in &self.handlers {
            handler.shutdown().await;
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        *msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}

// ---------------------------------------------------------------------------
// Processor trait implementation
// ---------------------------------------------------------------------------

impl Processor<CallEvent> for CallWebhookService {
    type Output = DispatchResult;
    type Error = Infallible;

    async fn process(&self, event: CallEvent) -> Result<DispatchResult, Infallible> {
        Ok(self.process_event(&event).await)
    }
}
