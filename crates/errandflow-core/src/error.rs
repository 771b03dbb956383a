//! Core error types for errandflow-core.
//!
//! Contract violations (shape mismatches, negative durations) surface as
//! [`ValidationError`]. Recoverable data-quality problems are not errors; see
//! [`crate::task::DataWarning`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for errandflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid input handed to the sequencer or timeline builder
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Travel-time lookup errors
    #[error("Travel oracle error: {0}")]
    Oracle(#[from] OracleError),

    /// Location lookup errors
    #[error("Location resolver error: {0}")]
    Resolver(#[from] ResolverError),

}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// One route leg is required per ordered stop
    #[error("Leg count mismatch: {tasks} ordered tasks but {legs} legs")]
    LegCountMismatch { tasks: usize, legs: usize },

    /// Service time cannot be negative
    #[error("Task '{task_id}' has negative duration ({minutes} minutes)")]
    NegativeDuration { task_id: String, minutes: f64 },

    /// Service time must be a finite number
    #[error("Task '{task_id}' has a non-finite duration")]
    NonFiniteDuration { task_id: String },

    /// Travel time cannot be negative or non-finite
    #[error("Leg to task '{task_id}' has invalid travel time ({seconds} seconds)")]
    InvalidTravel { task_id: String, seconds: f64 },

    /// Travel or service time pushes a timestamp past the representable range
    #[error("Timing for task '{task_id}' is out of range")]
    TimeOutOfRange { task_id: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Dot-path key that does not exist in the config tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Travel oracle errors.
#[derive(Error, Debug)]
pub enum OracleError {
    /// Transport failure talking to the routing service
    #[error("Routing request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Routing base URL could not be parsed
    #[error("Invalid routing URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-success HTTP status
    #[error("Routing service returned status {status}")]
    Status { status: u16 },

    /// Response body did not have the expected shape
    #[error("Malformed routing response: {0}")]
    MalformedResponse(String),

    /// Service answered but found no route between the points
    #[error("No route found: {0}")]
    NoRoute(String),
}

/// Location resolver errors.
#[derive(Error, Debug)]
pub enum ResolverError {
    /// Transport failure talking to the lookup service
    #[error("Location lookup failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Lookup base URL could not be parsed
    #[error("Invalid lookup URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-success HTTP status
    #[error("Location service returned status {status}")]
    Status { status: u16 },

    /// Response body did not have the expected shape
    #[error("Malformed location response: {0}")]
    MalformedResponse(String),

    /// Nothing matched the query
    #[error("No location found for '{0}'")]
    NotFound(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leg_mismatch_message_names_both_counts() {
        let err = ValidationError::LegCountMismatch { tasks: 3, legs: 2 };
        assert_eq!(err.to_string(), "Leg count mismatch: 3 ordered tasks but 2 legs");
    }

    #[test]
    fn validation_error_converts_into_core_error() {
        let err: CoreError = ValidationError::NegativeDuration {
            task_id: "a".into(),
            minutes: -5.0,
        }
        .into();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(err.to_string().contains("negative duration"));
    }
}
