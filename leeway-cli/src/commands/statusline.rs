//! Statusline command - manage the Claude Code status line integration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use leeway_store::{SettingsStore, generate_statusline_script, statusline};
use serde::Serialize;
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the statusline command.
#[derive(Args)]
pub struct StatuslineArgs {
    #[command(subcommand)]
    pub action: StatuslineAction,
}

/// Statusline subcommands.
#[derive(Subcommand)]
pub enum StatuslineAction {
    /// Write the script and point Claude Code at it.
    Install,

    /// Remove the script and the `statusLine` setting.
    Uninstall,

    /// Show whether the statusline is installed.
    Status,

    /// Print the script to stdout.
    Print,
}

/// JSON shape of `statusline status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusOutput {
    installed: bool,
    script_path: String,
    script_present: bool,
    settings_path: String,
    configured_command: Option<String>,
}

/// Runs the statusline command.
pub async fn run(args: &StatuslineArgs, store: &SettingsStore, cli: &Cli) -> Result<()> {
    if matches!(args.action, StatuslineAction::Print) {
        print!("{}", generate_statusline_script());
        return Ok(());
    }

    let (script_path, settings_path) = resolve_paths(store).await?;

    match args.action {
        StatuslineAction::Install => {
            statusline::install(&script_path, &settings_path).await?;
            info!(script = %script_path.display(), "Statusline installed");
            println!("Installed statusline script: {}", script_path.display());
            println!("Updated Claude Code settings:  {}", settings_path.display());
            println!("Restart Claude Code to see the new status line.");
        }
        StatuslineAction::Uninstall => {
            statusline::uninstall(&script_path, &settings_path).await?;
            info!(script = %script_path.display(), "Statusline uninstalled");
            println!("Statusline removed.");
        }
        StatuslineAction::Status => {
            let status = statusline::status(&script_path, &settings_path).await?;
            match cli.format {
                OutputFormat::Text => {
                    let installed = if status.is_installed() { "yes" } else { "no" };
                    let script = if status.script_present { "present" } else { "missing" };
                    println!("Installed: {installed}");
                    println!("Script:    {} ({script})", script_path.display());
                    println!("Settings:  {}", settings_path.display());
                    match &status.configured_command {
                        Some(command) if *command != status.expected_command => {
                            println!("Command:   {command} (not managed by Leeway)");
                        }
                        Some(command) => println!("Command:   {command}"),
                        None => println!("Command:   (none)"),
                    }
                }
                OutputFormat::Json => {
                    let output = StatusOutput {
                        installed: status.is_installed(),
                        script_path: script_path.display().to_string(),
                        script_present: status.script_present,
                        settings_path: settings_path.display().to_string(),
                        configured_command: status.configured_command,
                    };
                    println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
                }
            }
        }
        StatuslineAction::Print => {}
    }

    Ok(())
}

/// Script and Claude Code settings paths, honouring the settings overrides.
async fn resolve_paths(store: &SettingsStore) -> Result<(PathBuf, PathBuf)> {
    let settings = store.get().await;
    let script_path = settings
        .statusline_script_path
        .or_else(statusline::default_script_path)
        .context("Could not determine the statusline script path")?;
    let settings_path = settings
        .claude_settings_path
        .or_else(statusline::default_claude_settings_path)
        .context("Could not determine the Claude Code settings path")?;
    Ok((script_path, settings_path))
}
