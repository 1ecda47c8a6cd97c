//! Fixed queries over the package database and their decoding.

use crate::cursor::{Cards, Cursor, Notes, Reviews};
use crate::error::{ErrorKind, Result};
use apkg_database::Database;
use apkg_model::{Card, Collection, GraveKind, Id, Note, Review, Value, coerce};
use exn::OptionExt;
use tracing::instrument;

const GRAVES: &str = include_str!("../queries/graves.sql");
const COLLECTION: &str = include_str!("../queries/collection.sql");
const CREATED: &str = include_str!("../queries/created.sql");
const NOTES: &str = include_str!("../queries/notes.sql");
const CARDS: &str = include_str!("../queries/cards.sql");
const REVIEWS: &str = include_str!("../queries/reviews.sql");

fn grave_kind(kind: GraveKind) -> [Value; 1] {
    [Value::Integer(kind.code())]
}

/// Ids of deleted objects of one kind.
fn graves(db: &Database, kind: GraveKind) -> Result<Vec<Id>> {
    db.all(GRAVES, &grave_kind(kind))
        .map_err(ErrorKind::database)?
        .iter()
        .map(|row| row.decode("oid", coerce::id).map_err(ErrorKind::model))
        .collect()
}

/// Decode the collection row, drop deleted decks and attach deck configs.
///
/// Either the whole collection is returned or nothing is.
#[instrument(level = "debug", skip_all)]
pub(crate) fn collection(db: &Database) -> Result<Collection> {
    let deleted = graves(db, GraveKind::Deck)?;
    let row = db
        .get(COLLECTION, &[])
        .map_err(ErrorKind::database)?
        .ok_or_raise(|| ErrorKind::Format("missing collection row".to_string()))?;
    let mut collection = Collection::try_from(&row).map_err(ErrorKind::model)?;
    let removed = collection.remove_decks(deleted);
    tracing::debug!(
        models = collection.models.len(),
        decks = collection.decks.len(),
        removed,
        "decoded collection"
    );
    collection.resolve_deck_configs().map_err(ErrorKind::model)?;
    Ok(collection)
}

/// Collection creation time in seconds; review-card due days count from it.
fn created(db: &Database) -> Result<i64> {
    let row = db
        .get(CREATED, &[])
        .map_err(ErrorKind::database)?
        .ok_or_raise(|| ErrorKind::Format("missing collection row".to_string()))?;
    row.decode("crt", coerce::integer).map_err(ErrorKind::model)
}

#[instrument(level = "debug", skip_all)]
pub(crate) fn notes(db: &Database) -> Result<Notes<'_>> {
    let rows = db.query(NOTES, &grave_kind(GraveKind::Note)).map_err(ErrorKind::database)?;
    Ok(Cursor::new(rows, |row| Note::try_from(row)))
}

#[instrument(level = "debug", skip_all)]
pub(crate) fn cards(db: &Database) -> Result<Cards<'_>> {
    let created = created(db)?;
    let rows = db.query(CARDS, &grave_kind(GraveKind::Card)).map_err(ErrorKind::database)?;
    Ok(Cursor::new(rows, move |row| Card::from_row(row, created)))
}

#[instrument(level = "debug", skip_all)]
pub(crate) fn reviews(db: &Database) -> Result<Reviews<'_>> {
    let rows = db.query(REVIEWS, &grave_kind(GraveKind::Card)).map_err(ErrorKind::database)?;
    Ok(Cursor::new(rows, |row| Review::try_from(row)))
}
