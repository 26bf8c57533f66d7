//! Configuration for the sync engine host
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/a11y-sync/config.toml)
//! 3. Built-in defaults (lowest priority)
//!
//! This is host configuration (where the cache lives, which remote to sync
//! with, how to log). The accessibility preferences themselves live in the
//! cache and the remote record, never here.

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod observability;
mod remote;
mod serialization;

#[cfg(test)]
mod tests;

pub use observability::{FileLogging, LogRotation, LoggingConfig};
pub use remote::{FileRemote, RemoteConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application directory name under the platform config/data dirs
pub const APP_DIR: &str = "a11y-sync";

/// Cache file name inside `cache_dir`
pub const CACHE_FILE: &str = "cache.json";

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Config file exists but is unusable
#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "Cannot read config file {}: {}", path.display(), source)
            }
            Self::Parse { path, message } => {
                write!(f, "Failed to parse config file {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { .. } => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the local preference cache
    pub cache_dir: PathBuf,

    /// Identity to sync as (normally supplied at runtime, not from the file)
    pub identity: Option<String>,

    /// Remote preference store
    pub remote: RemoteConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            identity: None,
            remote: RemoteConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub cache_dir: Option<String>,

    /// Optional [remote] section
    pub remote: Option<FileRemote>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/a11y-sync/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join(APP_DIR).join("config.toml"))
    }

    /// Path of the cache file inside `cache_dir`
    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(CACHE_FILE)
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        // Don't overwrite existing config
        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        // Config::default().to_toml() is the single source of truth
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists. A file that exists but cannot be read
    /// or parsed is an error rather than a silent fallback to defaults.
    fn load_file_config() -> Result<FileConfig, ConfigError> {
        let Some(path) = Self::config_path() else {
            return Ok(FileConfig::default());
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents).map_err(|e| ConfigError::Parse {
                path,
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let file = Self::load_file_config()?;
        Ok(Self::resolve(file, |key| std::env::var(key).ok()))
    }

    /// Layer `env` over `file` over defaults
    pub(crate) fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        // Cache directory: env > file > default
        let cache_dir = env("A11Y_SYNC_CACHE_DIR")
            .or(file.cache_dir)
            .map(PathBuf::from)
            .unwrap_or_else(default_cache_dir);

        // Identity: env only (runtime)
        let identity = env("A11Y_SYNC_IDENTITY").filter(|s| !s.trim().is_empty());

        // Remote: a URL in the environment switches sync on
        let mut remote = RemoteConfig::from_file(file.remote);
        if let Some(url) = env("A11Y_SYNC_REMOTE_URL") {
            remote.base_url = Some(url);
            remote.enabled = true;
        }
        if let Some(token) = env("A11Y_SYNC_REMOTE_TOKEN") {
            remote.token = Some(token);
        }

        let logging = LoggingConfig::from_file(file.logging);

        Self {
            cache_dir,
            identity,
            remote,
            logging,
        }
    }
}
