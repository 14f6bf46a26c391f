//! Error types for the barbershop engine.
//!
//! The calculation functions are total and never fail. Errors only arise at
//! the edges: loading configuration, parsing month tokens, and talking to the
//! booking store.

use thiserror::Error;

/// The main error type for the barbershop engine.
///
/// # Example
///
/// ```
/// use barbershop_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/booking.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/booking.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A named salary plan is not part of the loaded catalog.
    #[error("Salary plan not found: {name}")]
    PlanNotFound {
        /// The plan name that was requested.
        name: String,
    },

    /// A `YYYY-MM` month selector could not be parsed.
    #[error("Invalid month selector '{value}': {message}")]
    InvalidMonth {
        /// The raw selector.
        value: String,
        /// Why it was rejected.
        message: String,
    },

    /// The booking store failed to read or write a blob.
    #[error("Storage error for key '{key}': {message}")]
    Storage {
        /// The storage key involved.
        key: String,
        /// A description of the failure.
        message: String,
    },

    /// A value could not be serialized or deserialized.
    #[error("Serialization error: {message}")]
    Serialization {
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization {
            message: err.to_string(),
        }
    }
}
