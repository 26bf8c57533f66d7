//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;
use std::path::Path;

/// Quote a value as a TOML string, escaping whatever needs it
fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

fn toml_path(path: &Path) -> String {
    toml_string(&path.to_string_lossy())
}

impl Config {
    fn remote_url_to_toml(&self) -> String {
        match &self.remote.base_url {
            Some(url) => format!("base_url = {}\n", toml_string(url)),
            None => "# base_url = \"https://prefs.example.org/v1\"\n".to_string(),
        }
    }

    fn remote_token_to_toml(&self) -> String {
        match &self.remote.token {
            Some(token) => format!("token = {}\n", toml_string(token)),
            None => "# token = \"...\"               # or A11Y_SYNC_REMOTE_TOKEN\n".to_string(),
        }
    }

    /// Generate a complete TOML config string
    pub fn to_toml(&self) -> String {
        format!(
            r#"# a11y-sync configuration

# Directory for the local preference cache (A11Y_SYNC_CACHE_DIR overrides)
cache_dir = {cache_dir}

# Remote preference store, one record per signed-in identity
# A11Y_SYNC_REMOTE_URL overrides base_url and switches sync on
[remote]
enabled = {remote_enabled}
{remote_url}{remote_token}timeout_secs = {remote_timeout}
debounce_ms = {remote_debounce}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = {log_level}
# JSON file logging (in addition to stderr)
file_enabled = {log_file_enabled}
file_dir = {log_file_dir}
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = {log_file_prefix}
"#,
            cache_dir = toml_path(&self.cache_dir),
            remote_enabled = self.remote.enabled,
            remote_url = self.remote_url_to_toml(),
            remote_token = self.remote_token_to_toml(),
            remote_timeout = self.remote.timeout_secs,
            remote_debounce = self.remote.debounce_ms,
            log_level = toml_string(&self.logging.level),
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = toml_path(&self.logging.file_dir),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = toml_string(&self.logging.file_prefix),
        )
    }

    /// Write this config to `config_path()`
    pub fn save(&self) -> Result<(), std::io::Error> {
        let Some(path) = Self::config_path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config path",
            ));
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, self.to_toml())
    }
}
