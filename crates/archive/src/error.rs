//! Archive Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An archive error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The container can't be opened or read: missing file, not a zip,
    /// corrupt member.
    #[display("unreadable package container")]
    Archive,
    /// The container is a zip, but not laid out like a study package.
    #[display("malformed package: {_0}")]
    Format(#[error(not(source))] String),
    /// No media file with this display name.
    #[display("media file not found: {_0}")]
    NotFound(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
