//! Handler toggles.

use serde::{Deserialize, Serialize};

/// Enable flags for each handler variant.
///
/// A flag alone does not activate a handler: its destination must be
/// configured too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerToggles {
    pub third_party_enabled: bool,
    pub custom_url_enabled: bool,
    pub database_enabled: bool,
}

impl Default for HandlerToggles {
    fn default() -> Self {
        Self {
            third_party_enabled: true,
            custom_url_enabled: true,
            database_enabled: false,
        }
    }
}

impl HandlerToggles {
    /// All handlers switched off.
    pub fn none() -> Self {
        Self {
            third_party_enabled: false,
            custom_url_enabled: false,
            database_enabled: false,
        }
    }
}
