//! Error types for the center payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure that can surface outside the pure calculation layer:
//! configuration, validation, persistence and generative-text calls.

use thiserror::Error;

/// The main error type for the center payroll engine.
///
/// Calculations never fail; this type is returned from configuration loading,
/// input validation, store access and the generative-text client.
///
/// # Example
///
/// ```
/// use center_payroll::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
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

    /// A business field failed validation before any store call was made.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A month/year pair that does not name a calendar month.
    #[error("Invalid pay period {month}/{year}")]
    InvalidPeriod {
        /// The month that was supplied.
        month: u32,
        /// The year that was supplied.
        year: i32,
    },

    /// The backing store rejected an operation.
    #[error("Store {operation} on '{collection}' failed: {message}")]
    Store {
        /// The collection the operation targeted.
        collection: String,
        /// The operation that failed (e.g. "create", "update").
        operation: String,
        /// A description of the failure.
        message: String,
    },

    /// A record that was required for the operation does not exist.
    #[error("Record '{id}' not found in '{collection}'")]
    RecordNotFound {
        /// The collection that was searched.
        collection: String,
        /// The id that was looked up.
        id: String,
    },

    /// The generative-text service failed or returned nothing usable.
    #[error("Text generation failed: {message}")]
    TextGeneration {
        /// A description of the failure.
        message: String,
    },
}

impl EngineError {
    /// Builds a validation error for `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Builds a store error for an operation on a collection.
    pub fn store(
        collection: impl Into<String>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Store {
            collection: collection.into(),
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_validation_displays_field_and_message() {
        let error = EngineError::validation("student_name", "is required");
        assert_eq!(error.to_string(), "Invalid field 'student_name': is required");
    }

    #[test]
    fn test_invalid_period_displays_month_and_year() {
        let error = EngineError::InvalidPeriod {
            month: 13,
            year: 2026,
        };
        assert_eq!(error.to_string(), "Invalid pay period 13/2026");
    }

    #[test]
    fn test_store_error_displays_operation_and_collection() {
        let error = EngineError::store("salaries", "update", "connection reset");
        assert_eq!(
            error.to_string(),
            "Store update on 'salaries' failed: connection reset"
        );
    }

    #[test]
    fn test_record_not_found_displays_id() {
        let error = EngineError::RecordNotFound {
            collection: "profiles".to_string(),
            id: "t-1".to_string(),
        };
        assert_eq!(error.to_string(), "Record 't-1' not found in 'profiles'");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_validation() -> EngineResult<()> {
            Err(EngineError::validation("amount", "must be positive"))
        }

        fn propagates_error() -> EngineResult<()> {
            returns_validation()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
