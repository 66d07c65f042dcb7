//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use leeway_engine::{MAX_INTERVAL_SECS, MIN_INTERVAL_SECS, clamp_interval};
use leeway_store::{NOTIFICATION_THRESHOLDS, SettingsStore, default_config_dir};
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Set the refresh interval in seconds (15-300).
    SetInterval {
        /// Seconds between refreshes.
        secs: u64,
    },

    /// Enable or disable a notification threshold.
    SetNotify {
        /// Threshold: 75, 90, or 95.
        threshold: u8,
        /// on or off.
        state: Toggle,
    },

    /// Reset to defaults.
    Reset,
}

/// on/off switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    /// Enabled.
    On,
    /// Disabled.
    Off,
}

impl Toggle {
    fn enabled(self) -> bool {
        self == Self::On
    }
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, store: &SettingsStore, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(store, cli).await,
        ConfigAction::Path => show_paths(store, cli),
        ConfigAction::SetInterval { secs } => set_interval(*secs, store).await,
        ConfigAction::SetNotify { threshold, state } => {
            set_notify(*threshold, *state, store).await
        }
        ConfigAction::Reset => reset_config(store).await,
    }
}

async fn show_config(store: &SettingsStore, cli: &Cli) -> Result<()> {
    let settings = store.get().await;

    match cli.format {
        OutputFormat::Text => {
            let effective = clamp_interval(settings.refresh_interval_secs).as_secs();
            println!("Leeway Configuration");
            println!("{}", "─".repeat(40));
            println!();
            if effective == settings.refresh_interval_secs {
                println!("Refresh interval: {effective}s");
            } else {
                println!(
                    "Refresh interval: {}s (using {effective}s)",
                    settings.refresh_interval_secs
                );
            }
            println!("Notifications:");
            for threshold in NOTIFICATION_THRESHOLDS {
                let state = if settings.is_threshold_enabled(threshold) { "on" } else { "off" };
                println!("  • {threshold} %: {state}");
            }
            println!("Log level: {}", settings.log_level);
            if let Some(path) = &settings.credentials_path {
                println!("Credentials: {}", path.display());
            }
            if let Some(path) = &settings.statusline_script_path {
                println!("Statusline script: {}", path.display());
            }
            if let Some(path) = &settings.claude_settings_path {
                println!("Claude Code settings: {}", path.display());
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&settings)?);
        }
    }

    Ok(())
}

fn show_paths(store: &SettingsStore, cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = store.path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn set_interval(secs: u64, store: &SettingsStore) -> Result<()> {
    store.set_refresh_interval_secs(secs).await;
    store.save().await?;
    info!(secs, "Refresh interval updated");

    let effective = clamp_interval(secs).as_secs();
    if effective == secs {
        println!("Refresh interval set to {secs}s");
    } else {
        println!(
            "Refresh interval set to {secs}s; outside {MIN_INTERVAL_SECS}-{MAX_INTERVAL_SECS}s, {effective}s will be used"
        );
    }
    Ok(())
}

async fn set_notify(threshold: u8, state: Toggle, store: &SettingsStore) -> Result<()> {
    store.set_threshold_enabled(threshold, state.enabled()).await?;
    store.save().await?;
    info!(threshold, enabled = state.enabled(), "Notification threshold updated");

    let label = if state.enabled() { "enabled" } else { "disabled" };
    println!("Notification at {threshold} % {label}");
    Ok(())
}

async fn reset_config(store: &SettingsStore) -> Result<()> {
    store.update(|s| *s = leeway_store::Settings::default()).await;
    store.save().await?;
    println!("Configuration reset to defaults");
    Ok(())
}
