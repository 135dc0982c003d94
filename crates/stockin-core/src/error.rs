//! Error types for the stockin-core library.
//!
//! Extraction itself never fails: malformed input degrades confidence instead.
//! These errors cover the surrounding plumbing (configuration files, I/O).

use thiserror::Error;

/// Main error type for the stockin library.
#[derive(Error, Debug)]
pub enum StockinError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the stockin library.
pub type Result<T> = std::result::Result<T, StockinError>;
