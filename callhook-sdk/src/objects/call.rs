//! Call-lifecycle event payloads.
//!
//! The dispatcher only looks at the event type and the call id; everything
//! else is carried through to the handlers untouched. Unknown fields land in
//! `extra` so senders can attach their own data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload sent when a call starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallStartedPayload {
    pub call_id: String,
    /// Unix timestamp (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_number: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CallStartedPayload {
    pub fn new(call_id: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            started_at: None,
            from_number: None,
            to_number: None,
            extra: Map::new(),
        }
    }
}

/// Payload sent when a call ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallEndedPayload {
    pub call_id: String,
    /// Unix timestamp (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    /// Unix timestamp (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CallEndedPayload {
    pub fn new(call_id: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            started_at: None,
            ended_at: None,
            duration_seconds: None,
            end_reason: None,
            transcript: None,
            extra: Map::new(),
        }
    }
}

/// Discriminant of a [`CallEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallEventType {
    CallStarted,
    CallEnded,
}

impl CallEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallEventType::CallStarted => "call_started",
            CallEventType::CallEnded => "call_ended",
        }
    }
}

impl std::fmt::Display for CallEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A call-lifecycle event together with its payload.
///
/// Serialized as `{"event_type": "call_started", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", content = "payload", rename_all = "snake_case")]
pub enum CallEvent {
    CallStarted(CallStartedPayload),
    CallEnded(CallEndedPayload),
}

impl CallEvent {
    pub fn event_type(&self) -> CallEventType {
        match self {
            CallEvent::CallStarted(_) => CallEventType::CallStarted,
            CallEvent::CallEnded(_) => CallEventType::CallEnded,
        }
    }

    pub fn call_id(&self) -> &str {
        match self {
            CallEvent::CallStarted(p) => &p.call_id,
            CallEvent::CallEnded(p) => &p.call_id,
        }
    }

    /// Borrow the payload without its discriminant.
    pub fn payload(&self) -> CallPayloadRef<'_> {
        match self {
            CallEvent::CallStarted(p) => CallPayloadRef::Started(p),
            CallEvent::CallEnded(p) => CallPayloadRef::Ended(p),
        }
    }
}

impl From<CallStartedPayload> for CallEvent {
    fn from(value: CallStartedPayload) -> Self {
        CallEvent::CallStarted(value)
    }
}

impl From<CallEndedPayload> for CallEvent {
    fn from(value: CallEndedPayload) -> Self {
        CallEvent::CallEnded(value)
    }
}

/// A borrowed payload that serializes as the bare payload object.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum CallPayloadRef<'a> {
    Started(&'a CallStartedPayload),
    Ended(&'a CallEndedPayload),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_type_names() {
        assert_eq!(CallEventType::CallStarted.to_string(), "call_started");
        assert_eq!(CallEventType::CallEnded.to_string(), "call_ended");
        assert_eq!(
            CallEvent::from(CallEndedPayload::new("c1")).event_type(),
            CallEventType::CallEnded
        );
    }

    #[test]
    fn test_unknown_fields_are_kept() {
        let payload: CallStartedPayload = serde_json::from_value(json!({
            "call_id": "c1",
            "agent": "sales-bot",
        }))
        .unwrap();
        assert_eq!(payload.call_id, "c1");
        assert_eq!(payload.started_at, None);
        assert_eq!(payload.extra.get("agent"), Some(&json!("sales-bot")));

        let back = serde_json::to_value(&payload).unwrap();
        assert_eq!(back, json!({"call_id": "c1", "agent": "sales-bot"}));
    }

    #[test]
    fn test_tagged_event_format() {
        let event: CallEvent = serde_json::from_value(json!({
            "event_type": "call_ended",
            "payload": {"call_id": "c9", "duration_seconds": 42},
        }))
        .unwrap();
        assert_eq!(event.event_type(), CallEventType::CallEnded);
        assert_eq!(event.call_id(), "c9");
        match &event {
            CallEvent::CallEnded(p) => assert_eq!(p.duration_seconds, Some(42)),
            other => panic!("unexpected event: {other:?}"),
        }

        let payload = serde_json::to_value(event.payload()).unwrap();
        assert_eq!(payload, json!({"call_id": "c9", "duration_seconds": 42}));
    }

    #[test]
    fn test_missing_call_id_is_rejected() {
        let result = serde_json::from_value::<CallEndedPayload>(json!({"ended_at": 10}));
        assert!(result.is_err());
    }
}
