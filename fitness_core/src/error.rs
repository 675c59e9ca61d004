//! Error types for the fitness_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for fitness_core operations
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

    /// Record failed a domain invariant (empty name, zero sets, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Exercise name already taken in the library
    #[error("Exercise '{0}' already exists in the library")]
    DuplicateExercise(String),

    /// A referenced record does not exist
    #[error("Record not found: {0}")]
    NotFound(String),

    /// An aggregation was called on an empty history
    #[error("Empty history: {0}")]
    EmptyHistory(String),

    /// A list selection was out of range or not numeric
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
