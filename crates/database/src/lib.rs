//! Read-only access to the SQLite database embedded in a study package.
//!
//! SQLite can't open a database from memory or from inside a zip, so the
//! database member is first copied to a scratch file. From there the
//! [`Database`] hands out [`Row`](apkg_model::Row)s without interpreting
//! them: the storage class SQLite reports for each cell becomes the matching
//! [`Value`](apkg_model::Value) variant, and decoding is left to the caller.
//!
//! # Resources
//! A [`Database`] owns a current-thread `tokio` runtime, a small connection
//! pool, and the scratch file. [`RowStream`]s each hold one connection and
//! borrow the database, so it can only be closed once they are gone.

mod db;
pub mod error;
mod options;
mod rows;

pub use crate::db::Database;
pub use crate::options::Options;
pub use crate::rows::RowStream;
