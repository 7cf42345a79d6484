//! Error types and handling
//!
//! This module contains the error taxonomy for the monitor. Probing lookups
//! (unknown facility or violation while polling) are expressed as `Option`
//! results by the query surface; `MonitorError::NotFound` is reserved for
//! mutation paths that cannot proceed without the record.

use thiserror::Error;
use tracing::error;

/// Errors that can occur while monitoring or simulating
#[derive(Debug, Error)]
pub enum MonitorError {
    /// A facility, violation or evidence item was not found
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up
        entity: &'static str,
        /// Identifier that failed to resolve
        id: String,
    },

    /// Internal state is inconsistent with the requested operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Configuration was rejected
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Seed data could not be loaded or failed validation
    #[error("Seed data error: {0}")]
    SeedData(String),

    /// Tick scheduler could not be driven
    #[error("Scheduler error: {0}")]
    Scheduler(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MonitorError {
    /// Create a not-found error for the given entity kind
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound { entity, id: id.to_string() }
    }

    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        error!(component = "monitor", "invalid state: {}", msg);
        Self::InvalidState(msg)
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a seed data error
    pub fn seed_data(msg: impl Into<String>) -> Self {
        Self::SeedData(msg.into())
    }

    /// Create a scheduler error
    pub fn scheduler(msg: impl Into<String>) -> Self {
        Self::Scheduler(msg.into())
    }

    /// Whether this error is an absent-record result rather than a fault
    pub fn is_not_found(&self) -> bool {
        matches!(self, MonitorError::NotFound { .. })
    }

    /// Logic faults abort the current operation; the process keeps running
    pub fn is_fatal_to_operation(&self) -> bool {
        match self {
            MonitorError::NotFound { .. } => false,
            MonitorError::InvalidState(_) => true,
            MonitorError::Configuration(_) => true,
            MonitorError::SeedData(_) => true,
            MonitorError::Scheduler(_) => true,
            MonitorError::Io(_) => true,
            MonitorError::Serialization(_) => true,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            MonitorError::NotFound { .. } => "Not Found",
            MonitorError::InvalidState(_) => "Invalid State",
            MonitorError::Configuration(_) => "Configuration",
            MonitorError::SeedData(_) => "Seed Data",
            MonitorError::Scheduler(_) => "Scheduler",
            MonitorError::Io(_) => "IO",
            MonitorError::Serialization(_) => "Serialization",
        }
    }
}

impl From<crate::types::ConfigError> for MonitorError {
    fn from(error: crate::types::ConfigError) -> Self {
        MonitorError::Configuration(error.to_string())
    }
}

impl From<crate::types::ConfigValidationError> for MonitorError {
    fn from(error: crate::types::ConfigValidationError) -> Self {
        MonitorError::Configuration(error.to_string())
    }
}

/// Result type for monitor operations
pub type MonitorResult<T> = Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = MonitorError::not_found("violation", "VIO_123");
        assert!(error.is_not_found());
        assert!(!error.is_fatal_to_operation());
        assert_eq!(error.category(), "Not Found");
        assert_eq!(error.to_string(), "violation not found: VIO_123");

        let error = MonitorError::invalid_state("two active violations");
        assert!(!error.is_not_found());
        assert!(error.is_fatal_to_operation());
        assert_eq!(error.category(), "Invalid State");
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: MonitorError = io_error.into();
        assert_eq!(error.category(), "IO");

        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: MonitorError = json_error.into();
        assert_eq!(error.category(), "Serialization");

        let validation = crate::types::ConfigValidationError::InvalidFacilityCount(0);
        let error: MonitorError = validation.into();
        assert_eq!(error.category(), "Configuration");
    }
}
