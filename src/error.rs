//! Error types for the userload import pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`CsvError`] - Source reading and CSV parsing errors
//! - [`ConfigError`] - Missing or invalid environment configuration
//! - [`LoadError`] - Transactional batch insertion errors
//! - [`ReportError`] - Age distribution report errors
//! - [`ImportError`] - Top-level orchestration errors
//! - [`ServerError`] - HTTP server errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Note that row-level data problems (unparseable age, missing name
//! parts) are deliberately NOT errors anywhere in this hierarchy: the
//! schema mapper degrades them to documented defaults so bad data never
//! blocks an otherwise-successful import.

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors while reading or parsing the source file.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read the source file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Source has no data rows (zero or one line).
    #[error("Source is empty or missing data rows")]
    EmptySource,
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while reading environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing DATABASE_URL.
    #[error("Missing DATABASE_URL environment variable")]
    MissingDatabaseUrl,

    /// Missing CSV_FILE_PATH when an import was requested without a file.
    #[error("Missing CSV_FILE_PATH environment variable")]
    MissingCsvPath,

    /// A variable was present but unusable.
    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

// =============================================================================
// Loader Errors
// =============================================================================

/// Errors while inserting a batch inside one transaction.
///
/// Any variant here means the whole batch was rolled back; the store
/// never holds a partial import.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Could not open or finish the transaction.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// One row was rejected by the store; the batch was rolled back.
    #[error("Insert failed on record #{ordinal} (line {line_number}): {message}")]
    RowRejected {
        /// 1-based position of the record in the batch.
        ordinal: usize,
        /// Line number of the record in the source file.
        line_number: usize,
        /// Underlying database error message.
        message: String,
    },
}

// =============================================================================
// Report Errors
// =============================================================================

/// Errors while computing the age distribution report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Query failure while reading persisted ages.
    #[error("Report query failed: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// Import Errors (top-level)
// =============================================================================

/// Top-level orchestration errors.
///
/// This is the main error type returned by [`crate::pipeline::import_file`]
/// and friends. A report failure is intentionally absent: once the
/// transaction has committed, the import has succeeded and a failing
/// report is only logged.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Source reading / parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Batch insertion error (the transaction was rolled back).
    #[error("Load error: {0}")]
    Load(#[from] LoadError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Import pipeline error.
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for loader operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Result type for pipeline operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CsvError -> ImportError
        let csv_err = CsvError::EmptySource;
        let import_err: ImportError = csv_err.into();
        assert!(import_err.to_string().contains("empty"));

        // LoadError -> ImportError
        let load_err = LoadError::RowRejected {
            ordinal: 3,
            line_number: 4,
            message: "value too long".into(),
        };
        let import_err: ImportError = load_err.into();
        assert!(import_err.to_string().contains("#3"));
        assert!(import_err.to_string().contains("line 4"));
    }

    #[test]
    fn test_config_error_format() {
        let err = ConfigError::InvalidValue {
            name: "PORT".into(),
            message: "not a number".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("PORT"));
        assert!(msg.contains("not a number"));
    }
}
