// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Leeway Store
//!
//! Everything Leeway writes to disk.
//!
//! This crate provides:
//!
//! - **SettingsStore**: User preferences with persistence and change notification
//! - **Persistence**: Atomic JSON file I/O helpers
//! - **Statusline**: Installer for the Claude Code statusline script
//!
//! ## Usage
//!
//! ```ignore
//! use leeway_store::{SettingsStore, statusline};
//!
//! let settings = SettingsStore::load_default().await?;
//! let mut rx = settings.subscribe();
//! settings.set_refresh_interval_secs(120).await;
//! settings.save().await?;
//!
//! statusline::install(&script_path, &claude_settings_path).await?;
//! ```

pub mod error;
pub mod persistence;
pub mod settings_store;
pub mod statusline;

pub use error::{StatuslineError, StoreError};
pub use persistence::{
    default_config_dir, default_settings_path, ensure_dir, load_json, load_json_or_default,
    save_json, write_atomic,
};
pub use settings_store::{
    DEFAULT_REFRESH_INTERVAL_SECS, LogLevel, NOTIFICATION_THRESHOLDS, Settings, SettingsStore,
};
pub use statusline::{StatuslineStatus, generate_statusline_script};

#[cfg(test)]
mod persistence_tests;
