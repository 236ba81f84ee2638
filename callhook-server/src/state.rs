//! Application state shared across all request handlers.

use callhook_core::config::Settings;
use callhook_core::processors::CallWebhookService;
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
/// Both fields are fixed for the lifetime of the process.
#[derive(Clone)]
pub struct AppState {
    /// Settings the service was built from.
    pub settings: Arc<Settings>,
    /// Dispatches received call events to the active handlers.
    pub service: Arc<CallWebhookService>,
}

impl AppState {
    /// Create a new AppState from settings and the service built from them.
    pub fn new(settings: Arc<Settings>, service: Arc<CallWebhookService>) -> Self {
        Self { settings, service }
    }
}
