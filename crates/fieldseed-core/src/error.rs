//! # Error Types
//!
//! Defines `FieldSeedError`, the unified error enum for every failure mode in
//! the fieldseed pipeline. Variants carry the table, row and column involved
//! so a failed run can be diagnosed without re-running it with logging on.

use thiserror::Error;

/// All errors that can occur in fieldseed operations.
#[derive(Error, Debug)]
pub enum FieldSeedError {
    #[error("No existing data found for table '{table}'. Run full generation first.")]
    NoExistingData { table: String },

    #[error("Malformed row {row_index} in table '{table}', column '{column}': {message}")]
    MalformedRow {
        table: String,
        row_index: usize,
        column: String,
        message: String,
    },

    #[error("Stored columns of '{table}' no longer match the generator.\n  Stored:   {stored}\n  Expected: {expected}\n  Regenerate the dataset with `fieldseed generate` before extending it.")]
    SchemaDrift {
        table: String,
        stored: String,
        expected: String,
    },

    #[error("Table '{table}' is generated before its parent '{parent}'")]
    DependencyOrder { table: String, parent: String },

    #[error("Dependency cycle detected at table '{table}'")]
    CircularDependency { table: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Lock file error: {message}")]
    LockFile { message: String },

    #[error("Output error: {message}")]
    Output {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in table '{table}'")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, FieldSeedError>;
