//! Read-only decoder for flashcard study packages (`*.apkg`).
//!
//! A package is a zip holding a SQLite collection database and a media
//! manifest. [`Apkg`] opens one and exposes it as typed records:
//!
//! - [`Apkg::collection`] decodes global settings, note types (models), decks
//!   and deck configurations in one go, leaving out deleted decks.
//! - [`Apkg::notes`], [`Apkg::cards`] and [`Apkg::reviews`] return lazy
//!   cursors that leave out deleted records and decode one row at a time.
//! - [`Apkg::read_media`] returns a media file by the name notes refer to.
//!
//! Scheduling columns are normalized on the way out: due times become
//! timestamps, intervals become durations, and ease factors become plain
//! multipliers, whatever card type they came from.
//!
//! # Blocking
//! Everything here blocks the calling thread. The database is driven by a
//! private single-threaded `tokio` runtime, so calling into an [`Apkg`] from
//! inside another async runtime panics; use `spawn_blocking` there.
//!
//! # Example
//! ```no_run
//! let mut apkg = apkg::Apkg::open("German.apkg")?;
//! let collection = apkg.collection()?;
//! for card in apkg.cards()? {
//!     let card = card?;
//!     let deck = collection.deck(card.deck_id).map(|deck| deck.name.as_str());
//!     println!("{} in {deck:?} due {:?}", card.id, card.due);
//! }
//! apkg.close()?;
//! # Ok::<(), apkg::error::Error>(())
//! ```

mod assemble;
pub mod cursor;
pub mod error;

use crate::error::{ErrorKind, Result};
use apkg_archive::Archive;
use apkg_database::Database;
use exn::OptionExt;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::instrument;

pub use crate::cursor::{Cards, Cursor, Notes, Reviews};
pub use apkg_database::Options;
pub use apkg_model::models;
pub use apkg_model::{Card, CardQueue, CardType, Collection, Deck, DeckConfig, Id, Model, Note, Review};
pub use time;

struct Open {
    // Dropped before the archive it was materialized from.
    database: Database,
    archive: Archive,
}

/// An opened study package.
///
/// Cursors borrow the package, so it can't be closed while any are alive.
/// At most [`Options::max_connections`] cursors can be open at once; opening
/// another fails with [`ErrorKind::Busy`]. Calls made after
/// [`close`](Self::close) fail with [`ErrorKind::Closed`].
pub struct Apkg {
    open: Option<Open>,
}

impl Apkg {
    /// Open the package at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &Options::default())
    }

    #[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub fn open_with(path: impl AsRef<Path>, options: &Options) -> Result<Self> {
        let archive = Archive::open(path).map_err(ErrorKind::archive)?;
        Self::load(archive, options)
    }

    /// Open a package held in memory.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        Self::from_bytes_with(bytes, &Options::default())
    }

    pub fn from_bytes_with(bytes: impl Into<Vec<u8>>, options: &Options) -> Result<Self> {
        let archive = Archive::from_bytes(bytes).map_err(ErrorKind::archive)?;
        Self::load(archive, options)
    }

    /// Open a package from any seekable reader.
    pub fn from_reader(reader: impl Read + Seek + 'static) -> Result<Self> {
        Self::from_reader_with(reader, &Options::default())
    }

    pub fn from_reader_with(reader: impl Read + Seek + 'static, options: &Options) -> Result<Self> {
        let archive = Archive::from_reader(reader).map_err(ErrorKind::archive)?;
        Self::load(archive, options)
    }

    fn load(archive: Archive, options: &Options) -> Result<Self> {
        let database = archive
            .with_database(|member| Database::materialize(member, options))
            .map_err(ErrorKind::archive)?
            .map_err(ErrorKind::database)?;
        tracing::debug!(database = archive.database_member(), media = archive.media().len(), "opened package");
        Ok(Self { open: Some(Open { database, archive }) })
    }

    fn state(&self) -> Result<&Open> {
        self.open.as_ref().ok_or_raise(|| ErrorKind::Closed)
    }

    /// Decode the collection: settings, models, decks and deck configs.
    ///
    /// Deleted decks are left out and every remaining deck has its
    /// configuration attached. A deck referring to a missing configuration
    /// fails the whole call with [`ErrorKind::Integrity`].
    pub fn collection(&self) -> Result<Collection> {
        assemble::collection(&self.state()?.database)
    }

    /// Notes, oldest id first, excluding deleted notes.
    pub fn notes(&self) -> Result<Notes<'_>> {
        assemble::notes(&self.state()?.database)
    }

    /// Cards, oldest id first, excluding deleted cards.
    pub fn cards(&self) -> Result<Cards<'_>> {
        assemble::cards(&self.state()?.database)
    }

    /// Review history, newest first, excluding reviews of deleted cards.
    pub fn reviews(&self) -> Result<Reviews<'_>> {
        assemble::reviews(&self.state()?.database)
    }

    /// Contents of the media file notes refer to as `name`.
    pub fn read_media(&self, name: &str) -> Result<Vec<u8>> {
        self.state()?.archive.read_media(name).map_err(ErrorKind::archive)
    }

    /// Names of the media files in the package, sorted.
    pub fn media_names(&self) -> Result<impl Iterator<Item = &str>> {
        Ok(self.state()?.archive.media_names())
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.open.is_none()
    }

    /// Release the database, its scratch file, and the container.
    ///
    /// Every release step is attempted; the first failure is returned.
    /// Closing an already closed package does nothing.
    #[instrument(level = "debug", skip_all)]
    pub fn close(&mut self) -> Result<()> {
        let Some(Open { mut database, archive }) = self.open.take() else {
            return Ok(());
        };
        let result = database.close().map_err(ErrorKind::database);
        drop(database);
        drop(archive);
        result
    }
}

impl Drop for Apkg {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::warn!(error = ?err, "failed to release package");
        }
    }
}
