//! Core error types for Leeway.

use thiserror::Error;

/// Core error type for Leeway operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid data in a usage snapshot or credential view.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
