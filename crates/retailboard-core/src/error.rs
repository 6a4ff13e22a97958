//! Error types for retailboard-core
//!
//! One taxonomy shared by the metrics layer and the data store. Calculators
//! fail fast instead of substituting zeros for missing data; callers decide
//! how to present a section that has nothing to show.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for retailboard operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // Metrics Errors
    // ===================
    #[error("Empty input: {operation} requires at least one row")]
    EmptyInput { operation: &'static str },

    #[error("Insufficient data for {operation}: {reason}")]
    InsufficientData {
        operation: &'static str,
        reason: String,
    },

    #[error("Invalid column '{column}' in {table}: {reason}")]
    InvalidColumn {
        table: String,
        column: String,
        reason: String,
    },

    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    // ===================
    // Config Errors
    // ===================
    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    // ===================
    // Store Errors
    // ===================
    #[error("Database error while loading {view}")]
    Database {
        view: String,
        #[source]
        source: rusqlite::Error,
    },
}

impl CoreError {
    pub(crate) fn empty(operation: &'static str) -> Self {
        Self::EmptyInput { operation }
    }

    pub(crate) fn insufficient(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            operation,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_column(
        table: impl Into<String>,
        column: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidColumn {
            table: table.into(),
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// True when the section simply has no rows to analyze.
    ///
    /// The CLI renders these as "no data" instead of an error.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, CoreError::EmptyInput { .. })
    }
}

pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_message_names_operation() {
        let err = CoreError::empty("share calculation");
        assert!(err.is_empty_input());
        assert_eq!(
            err.to_string(),
            "Empty input: share calculation requires at least one row"
        );
    }

    #[test]
    fn test_invalid_column_message() {
        let err = CoreError::invalid_column("store_performance", "total_revenue", "expected REAL");
        assert!(!err.is_empty_input());
        assert_eq!(
            err.to_string(),
            "Invalid column 'total_revenue' in store_performance: expected REAL"
        );
    }
}
