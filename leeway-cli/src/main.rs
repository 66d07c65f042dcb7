// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Leeway CLI - Claude usage monitoring from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Show current usage
//! leeway
//!
//! # JSON output
//! leeway --format json --pretty
//!
//! # Keep refreshing, with desktop notifications
//! leeway watch
//!
//! # Install the Claude Code statusline
//! leeway statusline install
//!
//! # Only notify at 95 %
//! leeway config set-notify 75 off
//! leeway config set-notify 90 off
//! ```

mod commands;
mod notify;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use leeway_store::{LogLevel, SettingsStore};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{config, statusline, usage, watch};

// ============================================================================
// CLI Definition
// ============================================================================

/// Leeway CLI - Claude usage monitoring.
#[derive(Parser)]
#[command(name = "leeway")]
#[command(about = "Claude usage monitoring CLI")]
#[command(long_about = r#"
Leeway shows how much of your Claude subscription quota is left.

It reads the OAuth token the Claude Code CLI stores in
~/.claude/.credentials.json and never writes it.

Examples:
  leeway                         # Current usage
  leeway --format json           # JSON output
  leeway watch                   # Refresh periodically, notify at 75/90/95 %
  leeway statusline install      # Show usage in the Claude Code status line
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'usage' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Settings file to use instead of the default.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Cli {
    /// Whether text output may use ANSI colours.
    pub fn use_colors(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").is_none()
    }
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch current usage (default if no command specified).
    #[command(visible_alias = "u")]
    Usage,

    /// Refresh periodically and send desktop notifications.
    #[command(visible_alias = "w")]
    Watch,

    /// Manage the Claude Code statusline integration.
    Statusline(statusline::StatuslineArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// General error.
    Error = 1,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, level: LogLevel) {
    // RUST_LOG wins over both the flag and the saved level.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("leeway=debug")
        } else {
            EnvFilter::new(format!("leeway={level}"))
        }
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {e}");
        std::process::exit(ExitCode::Error as i32);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let store = match &cli.config {
        Some(path) => SettingsStore::load(path.clone()).await?,
        None => SettingsStore::load_default().await?,
    };
    let store = Arc::new(store);

    setup_logging(cli.verbose, store.get().await.log_level);

    match &cli.command {
        Some(Commands::Usage) | None => usage::run(&store, cli).await,
        Some(Commands::Watch) => watch::run(store, cli).await,
        Some(Commands::Statusline(args)) => statusline::run(args, &store, cli).await,
        Some(Commands::Config(args)) => config::run(args, &store, cli).await,
    }
}
