//! Configuration tests

use super::*;
use std::collections::HashMap;
use std::path::PathBuf;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn no_env(_: &str) -> Option<String> {
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

/// Verify that serialized config can be parsed back.
#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );

    let resolved = Config::resolve(parsed.unwrap(), no_env);
    assert_eq!(resolved, config);
}

#[test]
fn test_config_roundtrip_customized() {
    let config = Config {
        cache_dir: PathBuf::from("/var/lib/a11y"),
        identity: None,
        remote: RemoteConfig {
            enabled: true,
            base_url: Some("https://prefs.example.org/v1".to_string()),
            token: Some("s3cret".to_string()),
            timeout_secs: 3,
            debounce_ms: 250,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            file_enabled: true,
            file_dir: PathBuf::from("/tmp/a11y-logs"),
            file_rotation: LogRotation::Hourly,
            file_prefix: "sync".to_string(),
        },
    };

    let parsed: FileConfig = toml::from_str(&config.to_toml()).unwrap();
    assert_eq!(Config::resolve(parsed, no_env), config);
}

/// Windows data dirs and arbitrary tokens must survive the template.
#[test]
fn test_config_roundtrip_escapes_strings() {
    let mut config = Config {
        cache_dir: PathBuf::from(r"C:\Users\ana\AppData\Roaming\a11y-sync"),
        ..Config::default()
    };
    config.remote.enabled = true;
    config.remote.base_url = Some("http://localhost:9000/api/".to_string());
    config.remote.token = Some(r#"to"ken\with'quotes"#.to_string());
    config.logging.file_dir = PathBuf::from(r"D:\logs\a11y");
    config.logging.file_prefix = "sync \"nightly\"".to_string();

    let toml_str = config.to_toml();
    let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
    assert!(
        parsed.is_ok(),
        "Escaped config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );
    assert_eq!(Config::resolve(parsed.unwrap(), no_env), config);
}

// ─────────────────────────────────────────────────────────────────────────────
// Layering
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_file_gives_defaults() {
    let config = Config::resolve(FileConfig::default(), no_env);
    assert_eq!(config.remote, RemoteConfig::default());
    assert_eq!(config.remote.endpoint(), None);
    assert_eq!(config.logging, LoggingConfig::default());
    assert_eq!(config.identity, None);
    assert!(config.cache_path().ends_with("cache.json"));
}

#[test]
fn test_partial_sections_backfill() {
    let file: FileConfig = toml::from_str(
        r#"
[remote]
base_url = "http://localhost:9000"

[logging]
file_rotation = "weekly"
"#,
    )
    .unwrap();

    let config = Config::resolve(file, no_env);
    assert!(!config.remote.enabled, "url alone does not switch sync on");
    assert_eq!(config.remote.base_url.as_deref(), Some("http://localhost:9000"));
    assert_eq!(config.remote.debounce_ms, 1000);
    assert_eq!(config.logging.file_rotation, LogRotation::Daily);
}

#[test]
fn test_env_overrides_file() {
    let file: FileConfig = toml::from_str(
        r#"
cache_dir = "/from/file"

[remote]
enabled = false
base_url = "http://file.example"
"#,
    )
    .unwrap();

    let env = env_from(&[
        ("A11Y_SYNC_CACHE_DIR", "/from/env"),
        ("A11Y_SYNC_REMOTE_URL", "http://env.example"),
        ("A11Y_SYNC_REMOTE_TOKEN", "tok"),
        ("A11Y_SYNC_IDENTITY", "user-1"),
    ]);
    let config = Config::resolve(file, env);

    assert_eq!(config.cache_dir, PathBuf::from("/from/env"));
    assert_eq!(config.remote.base_url.as_deref(), Some("http://env.example"));
    assert_eq!(config.remote.endpoint(), Some("http://env.example"));
    assert_eq!(config.remote.token.as_deref(), Some("tok"));
    assert_eq!(config.identity.as_deref(), Some("user-1"));
}

#[test]
fn test_blank_identity_is_none() {
    let config = Config::resolve(FileConfig::default(), env_from(&[("A11Y_SYNC_IDENTITY", "  ")]));
    assert_eq!(config.identity, None);
}

#[test]
fn test_zero_timeout_is_raised() {
    let file: FileConfig = toml::from_str("[remote]\ntimeout_secs = 0\n").unwrap();
    assert_eq!(Config::resolve(file, no_env).remote.timeout_secs, 1);
}

#[test]
fn test_default_template_documents_every_section() {
    let template = Config::default().to_toml();
    for section in ["[remote]", "[logging]", "cache_dir", "debounce_ms", "file_rotation"] {
        assert!(template.contains(section), "template missing {}", section);
    }
}

#[test]
fn test_log_rotation_parsing() {
    assert_eq!("HOURLY".parse::<LogRotation>(), Ok(LogRotation::Hourly));
    assert_eq!(" never ".parse::<LogRotation>(), Ok(LogRotation::Never));
    assert!("sometimes".parse::<LogRotation>().is_err());
    assert_eq!(LogRotation::Hourly.to_string(), "hourly");
}
