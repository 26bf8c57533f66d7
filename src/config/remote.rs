//! Remote preference store settings

use serde::Deserialize;
use std::time::Duration;

/// Remote sync configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteConfig {
    /// Whether remote sync is attempted at all
    pub enabled: bool,
    /// Base URL; records live at `{base_url}/preferences/{identity}`
    pub base_url: Option<String>,
    /// Bearer token sent with every request
    pub token: Option<String>,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Quiet period before a burst of changes is pushed
    pub debounce_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: None,
            token: None,
            timeout_secs: 10,
            debounce_ms: 1000,
        }
    }
}

impl RemoteConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Base URL to sync against; `None` when sync is off or no URL is set
    pub fn endpoint(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.base_url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

/// Remote settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileRemote {
    pub enabled: Option<bool>,
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub debounce_ms: Option<u64>,
}

impl RemoteConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileRemote>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            enabled: file.enabled.unwrap_or(defaults.enabled),
            base_url: file.base_url.or(defaults.base_url),
            token: file.token.or(defaults.token),
            timeout_secs: file.timeout_secs.unwrap_or(defaults.timeout_secs).max(1),
            debounce_ms: file.debounce_ms.unwrap_or(defaults.debounce_ms),
        }
    }
}
