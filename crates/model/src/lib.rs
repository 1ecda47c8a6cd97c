//! Domain types for flashcard study packages.
//!
//! Everything stored in a package arrives as loosely-typed SQLite columns or
//! JSON text: timestamps in seconds or milliseconds, durations in days,
//! minutes or negated seconds, and 0/1 integers standing in for booleans.
//! This crate owns the rules for turning those raw [`Value`]s into typed
//! models, so that the database and archive layers never interpret data.
//!
//! # Layout
//! - [`Value`] and [`Row`] hold undecoded scalars.
//! - [`coerce`] holds the decode rules, shared by row decoding and serde.
//! - [`schedule`] normalizes card and review scheduling columns.
//! - [`models`] holds the decoded domain types.

pub mod coerce;
pub mod error;
mod id;
pub mod models;
pub mod schedule;
mod value;

pub use crate::id::Id;
pub use crate::models::{
    Card, CardQueue, CardType, Collection, Config, Deck, DeckConfig, GraveKind, Model, Note, Review, ReviewEase,
    ReviewKind,
};
pub use crate::value::{Row, Value};
