//! Configuration types for Callhook.
//!
//! These types represent the validated runtime configuration consumed by the
//! dispatch service. Loading and parsing is handled by the server crate; the
//! core only ever sees an immutable [`Settings`] snapshot passed in
//! explicitly.

mod handlers;

pub use handlers::HandlerToggles;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Default timeout for outbound HTTP deliveries.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Deployment environment the process runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Development,
    Staging,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "local"),
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown environment: {0} (expected local, development, staging or production)")]
pub struct UnknownEnvironment(pub String);

impl std::str::FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            _ => Err(UnknownEnvironment(s.to_string())),
        }
    }
}

/// Immutable configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub environment: Environment,
    /// Third-party automation webhook (e.g. a Make.com scenario).
    pub third_party_webhook_url: Option<Url>,
    /// Custom HTTP endpoint receiving the raw event.
    pub custom_webhook_url: Option<Url>,
    /// Postgres connection string for the database sink.
    pub database_url: Option<String>,
    pub handlers: HandlerToggles,
    /// Timeout applied by the HTTP client shared by the HTTP handlers.
    pub http_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            third_party_webhook_url: None,
            custom_webhook_url: None,
            database_url: None,
            handlers: HandlerToggles::default(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl Settings {
    /// The database URL, unless it is missing or blank.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
