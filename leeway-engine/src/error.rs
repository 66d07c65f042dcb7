//! Engine error types.

use thiserror::Error;

/// Errors surfaced by the engine's configuration seam.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration could not be read.
    #[error("Configuration unavailable: {0}")]
    Config(String),

    /// Settings store error.
    #[error("Store error: {0}")]
    Store(#[from] leeway_store::StoreError),
}
