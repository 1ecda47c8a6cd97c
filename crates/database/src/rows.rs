//! Lazy result streams and conversion of SQLite rows into [`Row`]s.

use crate::Database;
use crate::error::{ErrorKind, Result};
use apkg_model::{Row, Value};
use exn::ResultExt;
use futures::StreamExt;
use futures::stream::BoxStream;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column as _, Row as _, TypeInfo as _, ValueRef as _};

/// Storage class of a single result cell, as reported by SQLite.
enum Storage {
    Null,
    Integer,
    Real,
    Text,
    Blob,
}
impl Storage {
    fn of(row: &SqliteRow, index: usize) -> sqlx::Result<Self> {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(Self::Null);
        }
        Ok(match raw.type_info().name() {
            "NULL" => Self::Null,
            "INTEGER" | "BOOLEAN" => Self::Integer,
            "REAL" => Self::Real,
            "TEXT" => Self::Text,
            _ => Self::Blob,
        })
    }
}

/// Copy every column of a SQLite row into an owned [`Row`], keeping the
/// storage class each value actually had.
pub(crate) fn convert(row: &SqliteRow) -> sqlx::Result<Row> {
    let mut out = Row::new();
    for (index, column) in row.columns().iter().enumerate() {
        let value = match Storage::of(row, index)? {
            Storage::Null => Value::Null,
            Storage::Integer => Value::Integer(row.try_get_unchecked(index)?),
            Storage::Real => Value::Real(row.try_get_unchecked(index)?),
            Storage::Text => Value::Text(row.try_get_unchecked(index)?),
            Storage::Blob => Value::Blob(row.try_get_unchecked(index)?),
        };
        out.push(column.name(), value);
    }
    Ok(out)
}

/// A lazy, forward-only stream of rows.
///
/// Each stream holds one pooled connection until it is exhausted, closed or
/// dropped, and counts towards the database's stream limit until then. It borrows the [`Database`] it came from, so the database can't be
/// closed underneath it.
pub struct RowStream<'a> {
    db: &'a Database,
    inner: Option<BoxStream<'a, sqlx::Result<SqliteRow>>>,
}
impl<'a> RowStream<'a> {
    pub(crate) fn new(db: &'a Database, inner: BoxStream<'a, sqlx::Result<SqliteRow>>) -> Self {
        Self { db, inner: Some(inner) }
    }

    /// Fetch the next row, or `None` once the result set is exhausted.
    ///
    /// After the end (or an error) the stream releases its connection and
    /// keeps returning `None`.
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        let Some(inner) = self.inner.as_mut() else {
            return Ok(None);
        };
        let next = self.db.block_on(inner.next());
        match next {
            Some(Ok(row)) => Ok(Some(convert(&row).or_raise(|| ErrorKind::Database)?)),
            Some(Err(err)) => {
                self.release();
                Err(err).or_raise(|| ErrorKind::Database)
            },
            None => {
                self.release();
                Ok(None)
            },
        }
    }

    /// Release the underlying connection early.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(inner) = self.inner.take() {
            {
                // Returning a pooled connection spawns onto the runtime.
                let _guard = self.db.enter();
                drop(inner);
            }
            self.db.stream_released();
        }
    }
}
impl Drop for RowStream<'_> {
    fn drop(&mut self) {
        self.release();
    }
}
impl Iterator for RowStream<'_> {
    type Item = Result<Row>;
    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}
