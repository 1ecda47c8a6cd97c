//! Zip container access for study packages.
//!
//! A package is a zip holding the collection database (`collection.anki21`,
//! or `collection.anki2` for older exports), a `media` manifest, and media
//! files stored under numeric member names. The manifest maps those numbers
//! back to the file names notes refer to, e.g. `{"0": "hund.jpg"}`.

mod container;
pub mod error;
mod media;

pub use crate::container::{Archive, DATABASE_MEMBERS, MEDIA_MEMBER, ReadSeek};
pub use crate::media::MediaIndex;
