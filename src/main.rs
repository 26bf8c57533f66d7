// a11y-sync - command-line host for the accessibility preference engine
//
// Startup:
// - Parse CLI; config-only commands return before anything else is built
// - Load host config (env > file > defaults) and install logging
// - Open the local cache, pick a remote store, hydrate the coordinator
// - Run the command, then flush the debounced remote write before exit

use a11y_sync::cli::{self, Cli, Commands};
use a11y_sync::config::Config;
use a11y_sync::logging;
use a11y_sync::persistence::{create_remote, FileCache, Identity, PersistenceCoordinator};
use a11y_sync::LogHaptics;
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config commands work even when the config file is broken
    if let Commands::Config { show, reset, path } = cli.command {
        return cli::handle_config(show, reset, path);
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let config = Config::from_env().context("Failed to load configuration")?;

    // Kept alive until exit so file logs flush
    let _log_guard = logging::init(&config.logging);

    let cache_path = config.cache_path();
    let cache = FileCache::open(&cache_path)
        .with_context(|| format!("Failed to open cache at {}", cache_path.display()))?;
    let remote = create_remote(&config.remote);

    let engine = PersistenceCoordinator::new(
        Arc::new(cache),
        remote,
        Arc::new(LogHaptics),
        config.remote.debounce(),
    );

    let identity = cli
        .identity
        .clone()
        .or_else(|| config.identity.clone())
        .map(Identity::new);
    tracing::debug!(cache = %cache_path.display(), remote = engine.remote_name(), "Starting");

    engine.hydrate(identity).await;

    let result = cli::run(&cli.command, &engine);

    // Push the last change now instead of waiting out the debounce window
    engine.flush().await;

    result
}
