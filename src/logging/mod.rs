// Logging setup
//
// stderr carries human-readable logs so stdout stays clean for command
// output. An optional JSON file layer writes structured logs through a
// non-blocking rolling appender.
//
// Precedence: RUST_LOG env var > config file > default

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogRotation, LoggingConfig};

/// Default filter directive for a configured level
pub fn default_filter(level: &str) -> String {
    format!("a11y_sync={},reqwest=warn,hyper=warn", level)
}

/// Build the rolling appender for the configured rotation
fn file_appender(config: &LoggingConfig) -> tracing_appender::rolling::RollingFileAppender {
    match config.file_rotation {
        LogRotation::Hourly => {
            tracing_appender::rolling::hourly(&config.file_dir, &config.file_prefix)
        }
        LogRotation::Daily => tracing_appender::rolling::daily(&config.file_dir, &config.file_prefix),
        LogRotation::Never => tracing_appender::rolling::never(&config.file_dir, &config.file_prefix),
    }
}

/// Install the global subscriber.
///
/// The returned guard must be kept alive for the duration of the program so
/// buffered file logs are flushed.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(&config.level).into());

    let stderr = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if !config.file_enabled {
        tracing_subscriber::registry().with(filter).with(stderr).init();
        return None;
    }

    if let Err(e) = std::fs::create_dir_all(&config.file_dir) {
        eprintln!(
            "Warning: Could not create log directory {:?}: {}",
            config.file_dir, e
        );
        tracing_subscriber::registry().with(filter).with(stderr).init();
        return None;
    }

    // Writes happen on a background thread
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender(config));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let directive = default_filter(level);
            assert!(directive.starts_with(&format!("a11y_sync={}", level)));
            assert!(EnvFilter::try_new(&directive).is_ok(), "{}", directive);
        }
    }

    #[test]
    fn test_file_appender_writes_into_dir() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            file_enabled: true,
            file_dir: dir.path().to_path_buf(),
            file_rotation: LogRotation::Never,
            file_prefix: "sync-test".to_string(),
            ..LoggingConfig::default()
        };

        let mut appender = file_appender(&config);
        appender.write_all(b"{\"msg\":\"hello\"}\n").unwrap();
        appender.flush().unwrap();

        assert!(dir.path().join("sync-test").exists());
    }
}
