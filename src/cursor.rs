//! Forward-only cursors decoding rows into domain records.

use crate::error::{ErrorKind, Result};
use apkg_database::RowStream;
use apkg_model::{Card, Note, Review, Row};
use exn::OptionExt;

type Decode<T> = Box<dyn Fn(&Row) -> apkg_model::error::Result<T>>;

/// A single pass over one query's rows.
///
/// Rows are fetched by [`advance`](Self::advance) and decoded on demand, so a
/// row that fails to decode only fails that one read; the cursor carries on
/// with the next row. A second pass needs a fresh cursor.
///
/// Cursors also implement [`Iterator`], which advances and decodes in one
/// step.
pub struct Cursor<'a, T> {
    rows: RowStream<'a>,
    current: Option<Row>,
    decode: Decode<T>,
}

pub type Notes<'a> = Cursor<'a, Note>;
pub type Cards<'a> = Cursor<'a, Card>;
pub type Reviews<'a> = Cursor<'a, Review>;

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn new(rows: RowStream<'a>, decode: impl Fn(&Row) -> apkg_model::error::Result<T> + 'static) -> Self {
        Self { rows, current: None, decode: Box::new(decode) }
    }

    /// Move to the next row. Returns `false` once the rows are exhausted.
    pub fn advance(&mut self) -> Result<bool> {
        self.current = self.rows.next_row().map_err(ErrorKind::database)?;
        Ok(self.current.is_some())
    }

    /// Decode the row the cursor is positioned on.
    pub fn current(&self) -> Result<T> {
        let row = self.current.as_ref().ok_or_raise(|| ErrorKind::NoRow)?;
        (self.decode)(row).map_err(ErrorKind::model)
    }

    /// Release the row stream before reaching the end. Dropping the cursor
    /// does the same.
    pub fn close(self) {
        self.rows.close();
    }
}

impl Cursor<'_, Note> {
    pub fn note(&self) -> Result<Note> {
        self.current()
    }
}

impl Cursor<'_, Card> {
    pub fn card(&self) -> Result<Card> {
        self.current()
    }
}

impl Cursor<'_, Review> {
    pub fn review(&self) -> Result<Review> {
        self.current()
    }
}

impl<T> Iterator for Cursor<'_, T> {
    type Item = Result<T>;
    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(true) => Some(self.current()),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
