// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Leeway Engine
//!
//! The refresh loop behind every Leeway front end.
//!
//! - [`refresh`] - [`RefreshController`], the actor that schedules fetches,
//!   cancels superseded ones, and debounces interval changes
//! - [`notifications`] - Once-per-epoch session threshold alerts
//! - [`config`] - The [`RefreshConfig`] seam and its fallbacks
//! - [`events`] - What the controller reports
//!
//! ## Example
//!
//! ```ignore
//! use leeway_engine::{EngineEvent, RefreshController};
//!
//! let (handle, mut events) = RefreshController::spawn(credentials, fetcher, settings);
//! while let Some(event) = events.recv().await {
//!     match event {
//!         EngineEvent::Notification(n) => println!("{}: {}", n.title(), n.body()),
//!         _ => {}
//!     }
//! }
//! handle.shutdown().await;
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod notifications;
pub mod refresh;

pub use config::{
    DEFAULT_INTERVAL_SECS, DEFAULT_THRESHOLDS, INTERVAL_DEBOUNCE, MAX_INTERVAL_SECS,
    MIN_INTERVAL_SECS, RefreshConfig, clamp_interval, forward_interval_changes,
};
pub use error::EngineError;
pub use events::{CREDENTIAL_EXPIRED_MESSAGE, EngineEvent, RefreshOutcome};
pub use notifications::{CLEAR_BELOW_PCT, NotificationState, evaluate};
pub use refresh::{RefreshController, RefreshHandle, RefreshPhase};
