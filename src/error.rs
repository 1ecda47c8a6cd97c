//! Package Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Errors from the archive, database
//! and model crates are re-raised under one of these kinds, keeping the
//! original frame as a child in the error tree.

use apkg_archive::error::{Error as ArchiveError, ErrorKind as ArchiveErrorKind};
use apkg_database::error::{Error as DatabaseError, ErrorKind as DatabaseErrorKind};
use apkg_model::Id;
use apkg_model::error::{Error as ModelError, ErrorKind as ModelErrorKind};
use derive_more::{Display, Error};

/// A package error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for package operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The container is missing, not a zip, or has a corrupt member.
    #[display("unreadable package container")]
    Archive,
    /// A required member or row is missing or malformed.
    #[display("malformed package: {_0}")]
    Format(#[error(not(source))] String),
    /// A stored value couldn't be coerced into its domain type.
    #[display("column `{column}` not coercible: {detail}")]
    Type { column: String, detail: String },
    /// A deck refers to a deck configuration that doesn't exist.
    #[display("deck {deck} references non-existent config {config}")]
    Integrity { deck: Id, config: Id },
    /// No media file with this name.
    #[display("media file not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// Scratch storage couldn't be created, written or released.
    #[display("scratch resource error")]
    Resource,
    /// The embedded database couldn't be opened or queried.
    #[display("database error")]
    Database,
    /// The package has already been closed.
    #[display("package is closed")]
    Closed,
    /// Too many cursors are open at once; close one and retry.
    #[display("too many open cursors")]
    Busy,
    /// A cursor was read before `advance` or after the end.
    #[display("cursor is not positioned on a row")]
    NoRow,
}

impl ErrorKind {
    #[track_caller]
    pub(crate) fn archive(err: ArchiveError) -> Error {
        let kind = match &*err {
            ArchiveErrorKind::Archive => Self::Archive,
            ArchiveErrorKind::Format(detail) => Self::Format(detail.clone()),
            ArchiveErrorKind::NotFound(name) => Self::NotFound(name.clone()),
        };
        err.raise(kind)
    }

    #[track_caller]
    pub(crate) fn database(err: DatabaseError) -> Error {
        let kind = match &*err {
            // The source is the decompressing database member.
            DatabaseErrorKind::Source => Self::Archive,
            DatabaseErrorKind::Resource => Self::Resource,
            DatabaseErrorKind::Database => Self::Database,
            DatabaseErrorKind::Closed => Self::Closed,
            DatabaseErrorKind::Busy => Self::Busy,
        };
        err.raise(kind)
    }

    #[track_caller]
    pub(crate) fn model(err: ModelError) -> Error {
        let kind = match &*err {
            ModelErrorKind::Type { column, detail } => Self::Type { column: column.clone(), detail: detail.clone() },
            ModelErrorKind::Integrity { deck, config } => Self::Integrity { deck: *deck, config: *config },
        };
        err.raise(kind)
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Resource | Self::Database | Self::Busy)
    }
}
