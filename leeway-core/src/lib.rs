// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Leeway Core
//!
//! Core types, models, and formatting helpers for Leeway.
//!
//! This crate provides the foundational types used across all other
//! Leeway crates:
//!
//! - The parsed usage snapshot and its buckets
//! - The OAuth credential view
//! - The threshold notification payload
//! - Countdown and error-message formatting
//!
//! ## Key Types
//!
//! - [`UsageData`] - Session, weekly, and opus buckets from one fetch
//! - [`UsageBucket`] - One utilization percentage with its reset instant
//! - [`StatusLevel`] - Safe / moderate / critical banding with colours
//! - [`Credentials`] - Access token and expiry
//! - [`NotificationEvent`] - A crossed threshold, rendered as title and body

pub mod error;
pub mod format;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    CRITICAL_THRESHOLD, Credentials, MODERATE_THRESHOLD, NotificationEvent, StatusLevel,
    UsageBucket, UsageData,
};

// Re-export formatting helpers
pub use format::{
    DEFAULT_ERROR_DISPLAY_LEN, PLACEHOLDER, format_reset, format_reset_opt, truncate_error,
};
