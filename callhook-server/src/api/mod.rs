//! Inbound webhook API.
//!
//! # Endpoints
//!
//! - `POST /webhooks/calls/started` – a call started (`CallStartedPayload`)
//! - `POST /webhooks/calls/ended`   – a call ended (`CallEndedPayload`)
//! - `POST /webhooks/calls`         – either event, tagged (`CallEvent`)
//!
//! Every endpoint answers `200` with a `DispatchResult` once the event has
//! been handed to all active handlers. Delivery failures are only visible in
//! the logs.

use axum::{Router, routing::post};

use crate::state::AppState;

mod webhooks;

/// Build the webhook API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/webhooks/calls", post(webhooks::call_event))
        .route("/webhooks/calls/started", post(webhooks::call_started))
        .route("/webhooks/calls/ended", post(webhooks::call_ended))
}
