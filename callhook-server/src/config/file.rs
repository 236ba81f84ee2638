//! TOML file configuration structures.
//!
//! These structs directly map to the `callhook.toml` file format. Every
//! section is optional.

use callhook_core::config::{DEFAULT_HTTP_TIMEOUT, Environment, HandlerToggles};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub environment: Environment,
    /// Timeout for outbound HTTP deliveries, in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub destinations: DestinationsConfig,
    #[serde(default)]
    pub handlers: HandlerToggles,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            http_timeout_secs: default_http_timeout_secs(),
            server: ServerConfig::default(),
            destinations: DestinationsConfig::default(),
            handlers: HandlerToggles::default(),
        }
    }
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT.as_secs()
}

/// Server configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080))
}

/// Where events are delivered. Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationsConfig {
    pub third_party_webhook_url: Option<String>,
    pub custom_webhook_url: Option<String>,
    pub database_url: Option<String>,
}
