//! Configuration the refresh controller reads.
//!
//! The controller only sees the [`RefreshConfig`] trait; failures fall back
//! to defaults instead of stopping the refresh loop.

use async_trait::async_trait;
use leeway_store::SettingsStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::refresh::RefreshHandle;

// ============================================================================
// Constants
// ============================================================================

/// Shortest allowed refresh interval, in seconds.
pub const MIN_INTERVAL_SECS: u64 = 15;

/// Longest allowed refresh interval, in seconds.
pub const MAX_INTERVAL_SECS: u64 = 300;

/// Interval used when configuration cannot be read, in seconds.
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Quiet period before an interval change is applied.
pub const INTERVAL_DEBOUNCE: Duration = Duration::from_millis(300);

/// Thresholds used when configuration cannot be read.
pub const DEFAULT_THRESHOLDS: [u8; 3] = [75, 90, 95];

// ============================================================================
// Config Seam
// ============================================================================

/// Source of the controller's tunables.
#[async_trait]
pub trait RefreshConfig: Send + Sync {
    /// Configured refresh interval, in seconds, before clamping.
    async fn refresh_interval_secs(&self) -> Result<u64, EngineError>;

    /// Enabled notification thresholds.
    async fn notification_thresholds(&self) -> Result<Vec<u8>, EngineError>;
}

#[async_trait]
impl RefreshConfig for SettingsStore {
    async fn refresh_interval_secs(&self) -> Result<u64, EngineError> {
        Ok(SettingsStore::refresh_interval_secs(self).await)
    }

    async fn notification_thresholds(&self) -> Result<Vec<u8>, EngineError> {
        Ok(self.enabled_thresholds().await)
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Clamps an interval to `[MIN_INTERVAL_SECS, MAX_INTERVAL_SECS]`.
pub fn clamp_interval(secs: u64) -> Duration {
    Duration::from_secs(secs.clamp(MIN_INTERVAL_SECS, MAX_INTERVAL_SECS))
}

/// Reads and clamps the refresh interval, falling back to the default.
pub async fn resolve_interval(config: &dyn RefreshConfig) -> Duration {
    match config.refresh_interval_secs().await {
        Ok(secs) => clamp_interval(secs),
        Err(e) => {
            warn!(error = %e, "Failed to read refresh interval, using default");
            Duration::from_secs(DEFAULT_INTERVAL_SECS)
        }
    }
}

/// Reads the enabled thresholds, sorted and de-duplicated.
///
/// Falls back to [`DEFAULT_THRESHOLDS`] when configuration fails.
pub async fn resolve_thresholds(config: &dyn RefreshConfig) -> Vec<u8> {
    match config.notification_thresholds().await {
        Ok(mut thresholds) => {
            thresholds.sort_unstable();
            thresholds.dedup();
            thresholds
        }
        Err(e) => {
            warn!(error = %e, "Failed to read notification thresholds, using defaults");
            DEFAULT_THRESHOLDS.to_vec()
        }
    }
}

// ============================================================================
// Settings Forwarding
// ============================================================================

/// Forwards refresh-interval changes in `store` to the controller.
///
/// Other settings changes are ignored. The task ends when the store is
/// dropped or the controller stops.
pub fn forward_interval_changes(store: Arc<SettingsStore>, handle: RefreshHandle) -> JoinHandle<()> {
    let mut changes = store.subscribe();
    tokio::spawn(async move {
        let mut last = SettingsStore::refresh_interval_secs(&store).await;
        while changes.changed().await.is_ok() {
            let current = SettingsStore::refresh_interval_secs(&store).await;
            if current == last {
                continue;
            }
            debug!(from = last, to = current, "Refresh interval setting changed");
            last = current;
            if !handle.interval_changed() {
                break;
            }
        }
    })
}
