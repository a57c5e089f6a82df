//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the freight lookup service, providing typed
//! outcomes for every failure kind the system distinguishes: startup data-load
//! failures, caller errors, and internal normalization failures.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from dataset loading, normalization, lookup
//!   and configuration
//! - **Output**: Structured error types with context, mapped to HTTP status
//!   codes at the API boundary
//! - **Error Categories**: Configuration, Dataset, Query, Normalization
//!
//! ## Key Features
//! - One error enum shared across the crate
//! - Not-found is *not* an error: lookups return `Ok(None)` and the boundary
//!   translates it uniformly
//! - Caller errors are distinguishable from server errors at the type level
//! - Structured logging integration via `category()`

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, LookupError>;

/// Error types for the freight lookup service
#[derive(Debug, Error)]
pub enum LookupError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Configuration field validation errors
    #[error("Validation failed for field '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    /// A source file could not be read or parsed
    #[error("Failed to load source '{source_path}': {details}")]
    SourceRead {
        source_path: String,
        details: String,
    },

    /// Concatenated sources disagree on their column sets
    #[error("Column mismatch in source '{source_path}': {details}")]
    ColumnMismatch {
        source_path: String,
        details: String,
    },

    /// The dataset failed to load at startup; lookups cannot be served
    #[error("Dataset is unavailable: {details}")]
    DatasetUnavailable { details: String },

    /// A column required by the configured key mapping is not in the table
    #[error("Column '{column}' not present in the dataset")]
    MissingColumn { column: String },

    /// The caller supplied an unusable query (e.g. no lookup key at all)
    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    /// A cell failed normalization while building a response record
    #[error("Normalization failed for column '{column}': {details}")]
    Normalization { column: String, details: String },

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl LookupError {
    /// Whether the error is the caller's fault (maps to a 4xx response)
    pub fn is_caller_error(&self) -> bool {
        matches!(self, LookupError::InvalidQuery { .. })
    }

    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            LookupError::Config { .. } | LookupError::ValidationFailed { .. } => "configuration",
            LookupError::SourceRead { .. }
            | LookupError::ColumnMismatch { .. }
            | LookupError::DatasetUnavailable { .. } => "dataset",
            LookupError::MissingColumn { .. } | LookupError::InvalidQuery { .. } => "query",
            LookupError::Normalization { .. } => "normalization",
            LookupError::Internal { .. } => "generic",
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for LookupError {
    fn from(err: std::io::Error) -> Self {
        LookupError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Internal {
            message: format!("JSON serialization error: {}", err),
        }
    }
}

impl From<toml::de::Error> for LookupError {
    fn from(err: toml::de::Error) -> Self {
        LookupError::Config {
            message: format!("TOML parse error: {}", err),
        }
    }
}
