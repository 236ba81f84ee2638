//! Event processors.
//!
//! - `CallWebhookService`: receives a `CallEvent`, delivers it to every
//!   active handler in turn

pub mod call_webhook;

pub use call_webhook::{CallWebhookService, HandlerOutcome};
