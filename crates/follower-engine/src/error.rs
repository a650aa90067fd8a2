//! Error types for the engine crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the engine before a run starts.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The names file does not exist
    #[error("names file not found: {}", path.display())]
    InputNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The names file exists but could not be read
    #[error("failed to read names file {}: {source}", path.display())]
    InputUnreadable {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
