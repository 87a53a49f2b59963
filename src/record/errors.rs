//! # Record Errors
//!
//! Error types for attribute writes on records.

use thiserror::Error;

use crate::schema::Value;

/// Result type for record operations
pub type RecordResult<T> = Result<T, RecordError>;

/// Record write errors. Both leave the record unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// Name not declared in the record's schema
    #[error("Unknown field \"{field}\"")]
    UnknownField { field: String },

    /// Value rejected by the field's spec
    #[error("Invalid value \"{value}\" for field \"{field}\"")]
    InvalidValue { field: String, value: Value },
}

impl RecordError {
    /// Name of the field the write targeted
    pub fn field(&self) -> &str {
        match self {
            RecordError::UnknownField { field } | RecordError::InvalidValue { field, .. } => field,
        }
    }
}
