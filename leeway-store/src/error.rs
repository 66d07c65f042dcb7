//! Store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the settings store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors from installing or removing the statusline integration.
#[derive(Debug, Error)]
pub enum StatuslineError {
    /// The settings path is a symlink whose target does not exist.
    #[error("{} is a broken symlink", path.display())]
    BrokenSymlink {
        /// The dangling link.
        path: PathBuf,
    },

    /// The settings file exists but is not a JSON object.
    #[error("{} is not a valid JSON object: {source}", path.display())]
    CorruptSettings {
        /// The unreadable settings file.
        path: PathBuf,
        /// Why it could not be used.
        #[source]
        source: serde_json::Error,
    },

    /// Ordinary filesystem failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
