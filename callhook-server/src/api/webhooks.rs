use axum::{Json, extract::State};
use callhook_sdk::objects::{CallEndedPayload, CallEvent, CallStartedPayload, DispatchResult};
use kanau::processor::Processor;

use crate::state::AppState;

/// `POST /webhooks/calls/started`
pub async fn call_started(
    state: State<AppState>,
    Json(payload): Json<CallStartedPayload>,
) -> Json<DispatchResult> {
    dispatch(&state, CallEvent::from(payload)).await
}

/// `POST /webhooks/calls/ended`
pub async fn call_ended(
    state: State<AppState>,
    Json(payload): Json<CallEndedPayload>,
) -> Json<DispatchResult> {
    dispatch(&state, CallEvent::from(payload)).await
}

/// `POST /webhooks/calls`: the event type comes from the body.
pub async fn call_event(
    state: State<AppState>,
    Json(event): Json<CallEvent>,
) -> Json<DispatchResult> {
    dispatch(&state, event).await
}

async fn dispatch(state: &AppState, event: CallEvent) -> Json<DispatchResult> {
    tracing::debug!(
        event_type = %event.event_type(),
        call_id = event.call_id(),
        "Received call webhook"
    );
    let Ok(result) = state.service.process(event).await;
    Json(result)
}
