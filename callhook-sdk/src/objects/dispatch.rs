//! Acknowledgement returned to webhook senders.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchStatus {
    /// No handler was active, nothing was invoked.
    Skipped,
    /// Every active handler was attempted. Individual handler failures are
    /// not reported here.
    Processed,
}

impl std::fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchStatus::Skipped => write!(f, "skipped"),
            DispatchStatus::Processed => write!(f, "processed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchResult {
    pub status: DispatchStatus,
    pub message: String,
}

impl DispatchResult {
    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            status: DispatchStatus::Skipped,
            message: message.into(),
        }
    }

    pub fn processed(message: impl Into<String>) -> Self {
        Self {
            status: DispatchStatus::Processed,
            message: message.into(),
        }
    }
}
