//! Error types for the coach_core library.
//!
//! Planning itself never fails; these errors only come out of the
//! configuration, history, import and export paths.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for coach_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// History lookup or update error
    #[error("History error: {0}")]
    History(String),

    /// Imported data failed validation
    #[error("Import rejected: {0}")]
    Import(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
