//! Configuration module for callhook-server.
//!
//! Handles loading configuration from a TOML file, then applying CLI
//! arguments and environment variables on top of it. The result is an
//! immutable [`Settings`] snapshot for the dispatch service.

pub mod file;

use crate::config::file::FileConfig;
use callhook_core::config::{Environment, Settings};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid {field}: {reason}")]
    InvalidUrl { field: &'static str, reason: String },

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Values taken from the command line or the environment. They win over
/// the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub listen: Option<SocketAddr>,
    pub environment: Option<Environment>,
    pub third_party_webhook_url: Option<String>,
    pub custom_webhook_url: Option<String>,
    pub database_url: Option<String>,
}

/// Loaded configuration result.
#[derive(Debug)]
pub struct LoadedConfig {
    pub listen: SocketAddr,
    pub settings: Settings,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    overrides: ConfigOverrides,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, overrides: ConfigOverrides) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            overrides,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file (a missing file means all defaults)
    /// 2. Apply CLI / environment overrides
    /// 3. Validate and build the settings snapshot
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let file_config = if self.config_path.exists() {
            let config_content = std::fs::read_to_string(&self.config_path)?;
            toml::from_str(&config_content)?
        } else {
            tracing::warn!(
                path = %self.config_path.display(),
                "Config file not found, using defaults and environment"
            );
            FileConfig::default()
        };

        self.build(file_config)
    }

    fn build(&self, mut file_config: FileConfig) -> Result<LoadedConfig, ConfigError> {
        let overrides = self.overrides.clone();
        if let Some(listen) = overrides.listen {
            file_config.server.listen = listen;
        }
        if let Some(environment) = overrides.environment {
            file_config.environment = environment;
        }

        let destinations = &mut file_config.destinations;
        if overrides.third_party_webhook_url.is_some() {
            destinations.third_party_webhook_url = overrides.third_party_webhook_url;
        }
        if overrides.custom_webhook_url.is_some() {
            destinations.custom_webhook_url = overrides.custom_webhook_url;
        }
        if overrides.database_url.is_some() {
            destinations.database_url = overrides.database_url;
        }

        if file_config.http_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "http_timeout_secs must be greater than zero".to_string(),
            ));
        }

        let settings = Settings {
            environment: file_config.environment,
            third_party_webhook_url: parse_http_url(
                "third_party_webhook_url",
                destinations.third_party_webhook_url.as_deref(),
            )?,
            custom_webhook_url: parse_http_url(
                "custom_webhook_url",
                destinations.custom_webhook_url.as_deref(),
            )?,
            database_url: non_empty(destinations.database_url.as_deref()).map(str::to_string),
            handlers: file_config.handlers,
            http_timeout: Duration::from_secs(file_config.http_timeout_secs),
        };

        Ok(LoadedConfig {
            listen: file_config.server.listen,
            settings,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse an optional destination URL, accepting only `http` and `https`.
fn parse_http_url(field: &'static str, value: Option<&str>) -> Result<Option<Url>, ConfigError> {
    let Some(raw) = non_empty(value) else {
        return Ok(None);
    };

    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        field,
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(Some(url)),
        other => Err(ConfigError::InvalidUrl {
            field,
            reason: format!("unsupported scheme {other:?}, expected http or https"),
        }),
    }
}
