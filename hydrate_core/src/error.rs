//! Error types for the hydrate_core library.

use crate::SessionPhase;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Rejection of a `start` request. The session is left exactly as it was.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Duration missing (zero) or below the minimum workout length
    #[error("Please enter a valid workout duration (minimum {min} minutes, got {got})")]
    DurationTooShort { got: u32, min: u32 },

    /// Duration above the longest supported workout
    #[error("Workout duration can be at most {max} minutes (got {got})")]
    DurationTooLong { got: u32, max: u32 },

    /// A session is already underway or finished and has not been reset
    #[error("Cannot start a workout while the session is {0}")]
    NotInSetup(SessionPhase),
}

/// Core error type for hydrate_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session start was rejected
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
