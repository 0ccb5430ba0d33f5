//! Error types for building, validating and merging ACH files.

use thiserror::Error;

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, AchError>;

/// Message used when a required field is left at its zero value.
pub const MSG_FIELD_INCLUSION: &str = "is a mandatory field and has a default value";

/// Message used when a numeric field holds non-digit characters.
pub const MSG_NUMERIC: &str = "has non numeric characters";

/// Message used when a field holds a value outside its allowed set.
pub const MSG_INVALID_VALUE: &str = "is not a valid value";

/// Errors that can occur while building, validating or merging files.
#[derive(Error, Debug)]
pub enum AchError {
    /// Structural problem with a file container (e.g. no batches)
    #[error("{field_name} {msg}")]
    File { field_name: String, msg: String },

    /// File control aggregate does not match the value computed from the batches
    #[error("{field_name} {observed} does not match calculated value {calculated}")]
    Mismatch {
        field_name: &'static str,
        calculated: u64,
        observed: u64,
    },

    /// Batch control aggregate does not match the value computed from the entries
    #[error("batch #{batch_number}: {field_name} {observed} does not match calculated value {calculated}")]
    BatchMismatch {
        batch_number: u32,
        field_name: &'static str,
        calculated: u64,
        observed: u64,
    },

    /// A single field violates its format or inclusion rule
    #[error("{field_name} {value} {msg}")]
    Field {
        field_name: &'static str,
        value: String,
        msg: String,
    },

    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid CSV import row
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Command-line value that parses but cannot be used
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl AchError {
    pub(crate) fn file(field_name: impl Into<String>, msg: impl Into<String>) -> Self {
        AchError::File {
            field_name: field_name.into(),
            msg: msg.into(),
        }
    }

    pub(crate) fn field(
        field_name: &'static str,
        value: impl ToString,
        msg: impl Into<String>,
    ) -> Self {
        AchError::Field {
            field_name,
            value: value.to_string(),
            msg: msg.into(),
        }
    }

    /// Name of the offending field, when the error is tied to one.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            AchError::File { field_name, .. } => Some(field_name.as_str()),
            AchError::Mismatch { field_name, .. }
            | AchError::BatchMismatch { field_name, .. }
            | AchError::Field { field_name, .. } => Some(*field_name),
            _ => None,
        }
    }

    /// Returns `true` for a required field left at its zero value.
    pub fn is_field_inclusion(&self) -> bool {
        matches!(self, AchError::Field { msg, .. } if msg == MSG_FIELD_INCLUSION)
    }
}
