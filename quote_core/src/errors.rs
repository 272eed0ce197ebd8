//! # Error Types
//!
//! Structured error types for quote_core. Pricing itself never fails: bad
//! numbers are coerced, not rejected. What remains are lookups of programs
//! or parts that do not exist and the read-only file loaders.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::errors::{QuoteError, QuoteResult};
//!
//! fn require_part(found: bool, id: &str) -> QuoteResult<()> {
//!     if !found {
//!         return Err(QuoteError::item_not_found(id));
//!     }
//!     Ok(())
//! }
//!
//! assert_eq!(require_part(false, "abc").unwrap_err().error_code(), "ITEM_NOT_FOUND");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for quote_core operations
pub type QuoteResult<T> = Result<T, QuoteError>;

/// Structured error type for quoting operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum QuoteError {
    /// No program with this ID is loaded in the session
    #[error("Program not found: {program_id}")]
    ProgramNotFound { program_id: String },

    /// No part with this ID is loaded in the session
    #[error("Part not found: {item_id}")]
    ItemNotFound { item_id: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl QuoteError {
    /// Create a ProgramNotFound error
    pub fn program_not_found(program_id: impl ToString) -> Self {
        QuoteError::ProgramNotFound {
            program_id: program_id.to_string(),
        }
    }

    /// Create an ItemNotFound error
    pub fn item_not_found(item_id: impl ToString) -> Self {
        QuoteError::ItemNotFound {
            item_id: item_id.to_string(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            QuoteError::ProgramNotFound { .. } => "PROGRAM_NOT_FOUND",
            QuoteError::ItemNotFound { .. } => "ITEM_NOT_FOUND",
            QuoteError::FileError { .. } => "FILE_ERROR",
            QuoteError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for QuoteError {
    fn from(e: serde_json::Error) -> Self {
        QuoteError::SerializationError {
            reason: e.to_string(),
        }
    }
}
