// CLI module - command-line argument parsing and handlers
//
// Preference commands run against a hydrated coordinator:
// - show, toggle, set, step, profile, profiles, reset, project, onboarding
//
// Configuration commands touch only the host config file:
// - config --show: Display effective configuration
// - config --path: Show config file path
// - config --reset: Regenerate config file with defaults

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;

use crate::config::{Config, VERSION};
use crate::model::{A11yConfig, Choice, ChoiceField, NumericField, StepDirection, ToggleField};
use crate::persistence::{IdentityState, PersistenceCoordinator};
use crate::profiles::ProfileId;
use crate::projection::{StyleRoot, ViewProjector};

/// a11y-sync - accessibility preferences with local cache and remote sync
#[derive(Parser, Debug)]
#[command(name = "a11y-sync")]
#[command(version = VERSION)]
#[command(about = "Accessibility preference engine with local cache and remote sync", long_about = None)]
pub struct Cli {
    /// Identity to sync as (omit to stay local-only)
    #[arg(long, global = true, env = "A11Y_SYNC_IDENTITY")]
    pub identity: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the current preferences
    Show {
        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Flip one on/off preference (e.g. lineFocus or line-focus)
    Toggle { field: String },

    /// Set one preference (e.g. `set fontSize 150`, `set spacing wide`)
    Set { field: String, value: String },

    /// Increase or decrease a numeric preference by one step
    Step {
        field: String,
        /// up or down
        direction: String,
    },

    /// Activate a profile; activating the active profile again resets
    Profile { id: String },

    /// List available profiles
    Profiles,

    /// Reset every preference to its default
    Reset,

    /// Print the style selectors and variables for the current preferences
    Project {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change the onboarding flag
    Onboarding {
        /// Mark onboarding as completed
        #[arg(long, conflicts_with = "reset")]
        complete: bool,

        /// Mark onboarding as not completed
        #[arg(long)]
        reset: bool,
    },

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Preference commands
// ─────────────────────────────────────────────────────────────────────────────

/// Run a preference command against a hydrated coordinator
pub fn run(command: &Commands, engine: &PersistenceCoordinator) -> Result<()> {
    match command {
        Commands::Show { json } => show(engine, *json),
        Commands::Toggle { field } => {
            let field = ToggleField::from_name(field)?;
            let config = engine.toggle(field);
            println!("{} = {}", field, on_off(config.toggle(field)));
            Ok(())
        }
        Commands::Set { field, value } => set(engine, field, value),
        Commands::Step { field, direction } => {
            let field = NumericField::from_key(field)?;
            let direction: StepDirection = direction.parse()?;
            let config = engine.step(field, direction);
            println!("{} = {}", field.key(), format_number(field, config.number(field)));
            Ok(())
        }
        Commands::Profile { id } => {
            let id: ProfileId = id.parse()?;
            let config = engine.activate_profile(id);
            match config.active_profile {
                Some(active) => println!("Activated profile: {}", active.label()),
                None => println!("Profile {} deactivated, preferences reset", id.label()),
            }
            Ok(())
        }
        Commands::Profiles => {
            list_profiles(engine.snapshot().active_profile);
            Ok(())
        }
        Commands::Reset => {
            engine.reset();
            println!("Preferences reset to defaults");
            Ok(())
        }
        Commands::Project { json } => project(&engine.snapshot(), *json),
        Commands::Onboarding { complete, reset } => {
            if *complete {
                engine.complete_onboarding();
            } else if *reset {
                engine.set_onboarding(false);
            }
            let status = if engine.onboarding_completed() {
                "completed"
            } else {
                "pending"
            };
            println!("onboarding: {}", status);
            Ok(())
        }
        Commands::Config { show, reset, path } => handle_config(*show, *reset, *path),
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn format_number(field: NumericField, value: f64) -> String {
    match field {
        NumericField::SpeechRate => format!("{:.2}", value),
        _ => format!("{}", value.round()),
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// `set` accepts enumerated, numeric and on/off fields
fn set(engine: &PersistenceCoordinator, field: &str, value: &str) -> Result<()> {
    if let Ok(choice_field) = ChoiceField::from_key(field) {
        let choice = Choice::parse(choice_field, value).with_context(|| {
            format!(
                "Expected one of: {}",
                choice_field.values().join(", ")
            )
        })?;
        engine.set_choice(choice);
        println!("{} = {}", choice_field.key(), choice.as_str());
        return Ok(());
    }

    if let Ok(numeric) = NumericField::from_key(field) {
        let requested: f64 = value
            .parse()
            .with_context(|| format!("{} expects a number, got {:?}", numeric.key(), value))?;
        let config = engine.set_number(numeric, requested);
        let applied = config.number(numeric);
        if !numeric.is_valid(requested) {
            let bounds = numeric.bounds();
            println!(
                "{} = {} (clamped to {}..={})",
                numeric.key(),
                format_number(numeric, applied),
                bounds.min,
                bounds.max
            );
        } else {
            println!("{} = {}", numeric.key(), format_number(numeric, applied));
        }
        return Ok(());
    }

    if let Ok(toggle) = ToggleField::from_name(field) {
        let Some(wanted) = parse_switch(value) else {
            bail!("{} expects on or off, got {:?}", toggle, value);
        };
        let current = engine.snapshot().toggle(toggle);
        if current != wanted {
            engine.toggle(toggle);
        }
        println!("{} = {}", toggle, on_off(wanted));
        return Ok(());
    }

    bail!("Unknown field: {}", field)
}

fn show(engine: &PersistenceCoordinator, json: bool) -> Result<()> {
    let config = engine.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&*config)?);
        return Ok(());
    }

    let profile = config
        .active_profile
        .map(|p| format!("{} ({})", p.as_str(), p.label()))
        .unwrap_or_else(|| "none".to_string());
    let sync = match engine.identity_state() {
        IdentityState::Anonymous => "local only".to_string(),
        IdentityState::Fetching(id) => format!("fetching for {}", id.short()),
        IdentityState::Linked(id) => format!("linked to {} via {}", id.short(), engine.remote_name()),
        IdentityState::Offline(id) => format!("offline for {} (local only)", id.short()),
    };

    println!("profile     {}", profile);
    println!(
        "onboarding  {}",
        if engine.onboarding_completed() { "completed" } else { "pending" }
    );
    println!("sync        {}", sync);
    println!();

    let enabled: Vec<&str> = ToggleField::ALL
        .iter()
        .filter(|&&f| config.toggle(f))
        .map(|f| f.key())
        .collect();
    if enabled.is_empty() {
        println!("enabled     (none)");
    } else {
        println!("enabled     {}", enabled.join(", "));
    }
    println!();

    for &field in ChoiceField::ALL {
        println!("{:<18}{}", field.key(), config.choice(field).as_str());
    }
    for &field in NumericField::ALL {
        println!("{:<18}{}", field.key(), format_number(field, config.number(field)));
    }
    Ok(())
}

fn project(config: &A11yConfig, json: bool) -> Result<()> {
    let mut projector = ViewProjector::new(StyleRoot::new());
    let projection = projector.render(config);

    if json {
        let value = serde_json::json!({
            "selectors": projection.selectors,
            "variables": projection.variables,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        let root = projector.target();
        println!("class=\"{}\"", root.to_class_attr());
        println!("style=\"{}\"", root.to_style_attr());
    }
    Ok(())
}

/// Print the profile catalog, marking `active`
fn list_profiles(active: Option<ProfileId>) {
    for &id in ProfileId::ALL {
        let marker = if Some(id) == active { "*" } else { " " };
        println!("{} {:<12} {:<22} {}", marker, id.as_str(), id.label(), id.description());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration commands
// ─────────────────────────────────────────────────────────────────────────────

/// Handle `config` flags. Needs no engine.
pub fn handle_config(show: bool, reset: bool, path: bool) -> Result<()> {
    if path {
        handle_config_path()
    } else if show {
        handle_config_show()
    } else if reset {
        handle_config_reset()
    } else {
        println!("Usage: a11y-sync config [--show|--reset|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --path    Show config file path");
        Ok(())
    }
}

fn handle_config_path() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show() -> Result<()> {
    let config = Config::from_env()?;

    println!("# Effective configuration (env > file > defaults)");
    println!();
    println!("cache_dir = {:?}", config.cache_dir.display().to_string());
    println!();
    println!("[remote]");
    println!("enabled = {}", config.remote.enabled);
    println!("base_url = {:?}", config.remote.base_url.as_deref().unwrap_or(""));
    println!("token = {:?}", if config.remote.token.is_some() { "(set)" } else { "" });
    println!("timeout_secs = {}", config.remote.timeout_secs);
    println!("debounce_ms = {}", config.remote.debounce_ms);
    println!();
    println!("[logging]");
    println!("level = {:?}", config.logging.level);
    println!("file_enabled = {}", config.logging.file_enabled);
    println!("file_rotation = {:?}", config.logging.file_rotation.as_str());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
    Ok(())
}

fn handle_config_reset() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    // Confirm if file exists
    if path.exists() {
        eprint!("Config file exists at {}. Overwrite? [y/N] ", path.display());
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    Config::default()
        .save()
        .with_context(|| format!("Error writing config to {}", path.display()))?;
    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_set_and_global_identity() {
        let cli = Cli::try_parse_from(["a11y-sync", "set", "fontSize", "150", "--identity", "u-1"])
            .unwrap();
        assert_eq!(cli.identity.as_deref(), Some("u-1"));
        assert!(matches!(
            cli.command,
            Commands::Set { ref field, ref value } if field == "fontSize" && value == "150"
        ));
    }

    #[test]
    fn test_onboarding_flags_conflict() {
        let parsed = Cli::try_parse_from(["a11y-sync", "onboarding", "--complete", "--reset"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_parse_config_flags() {
        let cli = Cli::try_parse_from(["a11y-sync", "config", "--path"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config { show: false, reset: false, path: true }
        ));
    }

    #[test]
    fn test_parse_switch() {
        assert_eq!(parse_switch("ON"), Some(true));
        assert_eq!(parse_switch("0"), Some(false));
        assert_eq!(parse_switch("maybe"), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(NumericField::SpeechRate, 1.25), "1.25");
        assert_eq!(format_number(NumericField::FontSize, 150.0), "150");
    }
}
