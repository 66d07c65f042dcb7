//! Domain models for Leeway.
//!
//! ## Submodules
//!
//! - [`usage`] - Parsed usage snapshot (`UsageData`, `UsageBucket`)
//! - [`status`] - Status levels and colours
//! - [`credentials`] - OAuth credential view
//! - [`notification`] - Threshold notification payload

mod credentials;
mod notification;
mod status;
mod usage;

pub use credentials::Credentials;
pub use notification::NotificationEvent;
pub use status::{CRITICAL_THRESHOLD, MODERATE_THRESHOLD, StatusLevel};
pub use usage::{UsageBucket, UsageData};
