//! User preferences store.
//!
//! Manages user settings with persistence and change notification.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};

/// Default refresh interval in seconds.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;

/// Thresholds a user can toggle, ascending.
pub const NOTIFICATION_THRESHOLDS: [u8; 3] = [75, 90, 95];

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Settings {
    /// Seconds between automatic refreshes. The engine clamps this.
    pub refresh_interval_secs: u64,

    /// Notify when session usage reaches 75 %.
    pub notify_at_75: bool,

    /// Notify when session usage reaches 90 %.
    pub notify_at_90: bool,

    /// Notify when session usage reaches 95 %.
    pub notify_at_95: bool,

    /// Where `statusline install` writes the script.
    pub statusline_script_path: Option<PathBuf>,

    /// Claude Code settings file `statusline install` edits.
    pub claude_settings_path: Option<PathBuf>,

    /// Overrides the Claude CLI credentials file.
    pub credentials_path: Option<PathBuf>,

    /// Log level.
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            notify_at_75: true,
            notify_at_90: true,
            notify_at_95: true,
            statusline_script_path: None,
            claude_settings_path: None,
            credentials_path: None,
            log_level: LogLevel::default(),
        }
    }
}

impl Settings {
    /// Enabled notification thresholds, ascending.
    pub fn enabled_thresholds(&self) -> Vec<u8> {
        NOTIFICATION_THRESHOLDS
            .into_iter()
            .filter(|t| self.is_threshold_enabled(*t))
            .collect()
    }

    /// Returns whether `threshold` is enabled. Unknown thresholds are not.
    pub fn is_threshold_enabled(&self, threshold: u8) -> bool {
        match threshold {
            75 => self.notify_at_75,
            90 => self.notify_at_90,
            95 => self.notify_at_95,
            _ => false,
        }
    }

    /// Enables or disables one of [`NOTIFICATION_THRESHOLDS`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] for any other threshold.
    pub fn set_threshold_enabled(&mut self, threshold: u8, enabled: bool) -> Result<(), StoreError> {
        let flag = match threshold {
            75 => &mut self.notify_at_75,
            90 => &mut self.notify_at_90,
            95 => &mut self.notify_at_95,
            other => {
                return Err(StoreError::Config(format!(
                    "unsupported notification threshold {other} (expected 75, 90, or 95)"
                )));
            }
        };
        *flag = enabled;
        Ok(())
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store with change notifications.
#[derive(Debug)]
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl SettingsStore {
    /// Creates a store with default settings, persisted at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self::with_settings(path, Settings::default())
    }

    /// Creates a store holding `settings`, persisted at `path`.
    pub fn with_settings(path: PathBuf, settings: Settings) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// A missing or unreadable file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the existence of the file cannot be checked.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let settings = if tokio::fs::try_exists(&path).await? {
            info!(path = %path.display(), "Loading settings");
            load_json(&path).await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            })
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        Ok(Self::with_settings(path, settings))
    }

    /// The file this store persists to.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings and notifies subscribers.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        {
            let mut settings = self.settings.write().await;
            f(&mut settings);
        }
        self.notify_change().await;
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Subscribes to settings changes.
    ///
    /// The value is a version counter bumped on every update.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    /// Notifies subscribers of a change.
    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }

    // ========================================================================
    // Convenience Methods
    // ========================================================================

    /// Gets the configured refresh interval in seconds.
    pub async fn refresh_interval_secs(&self) -> u64 {
        self.settings.read().await.refresh_interval_secs
    }

    /// Sets the refresh interval in seconds.
    pub async fn set_refresh_interval_secs(&self, secs: u64) {
        self.update(|s| s.refresh_interval_secs = secs).await;
    }

    /// Gets the enabled notification thresholds, ascending.
    pub async fn enabled_thresholds(&self) -> Vec<u8> {
        self.settings.read().await.enabled_thresholds()
    }

    /// Enables or disables a notification threshold.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] for thresholds other than 75, 90, 95.
    pub async fn set_threshold_enabled(&self, threshold: u8, enabled: bool) -> Result<(), StoreError> {
        let result = {
            let mut settings = self.settings.write().await;
            settings.set_threshold_enabled(threshold, enabled)
        };
        if result.is_ok() {
            self.notify_change().await;
        }
        result
    }
}

// ============================================================================
// Tests
// ============================================================================
