//! Model Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use crate::Id;
use derive_more::{Display, Error};

/// A decoding error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for decoding operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A column (or embedded JSON value) could not be coerced into the
    /// expected domain type. Don't retry with the same package.
    #[display("column `{column}` not coercible: {detail}")]
    Type {
        /// Column (or JSON member) that held the offending value.
        column: String,
        /// What was expected and what was found.
        detail: String,
    },
    /// A deck refers to a deck configuration that doesn't exist.
    #[display("deck {deck} references non-existent config {config}")]
    Integrity {
        /// The deck holding the dangling reference.
        deck: Id,
        /// The configuration it points to.
        config: Id,
    },
}

impl ErrorKind {
    pub(crate) fn column(column: impl Into<String>, detail: impl ToString) -> Self {
        Self::Type { column: column.into(), detail: detail.to_string() }
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The package contents never change between attempts.
        false
    }
}
