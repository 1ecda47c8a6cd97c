//! Database Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A database error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for database operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The byte source couldn't be read while materializing.
    #[display("could not read database source")]
    Source,
    /// Scratch file or runtime trouble: disk full, permissions, removal.
    #[display("scratch resource error")]
    Resource,
    /// SQLite refused to open or query the database.
    #[display("database error")]
    Database,
    /// The database has already been closed.
    #[display("database is closed")]
    Closed,
    /// Every connection is held by an open stream.
    #[display("too many open streams")]
    Busy,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Busy clears once a stream is closed; a full scratch disk can too.
        matches!(self, Self::Resource | Self::Database | Self::Busy)
    }
}
