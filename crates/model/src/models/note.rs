use crate::error::{Error, Result};
use crate::models::Model;
use crate::{Id, Row, coerce};
use time::UtcDateTime;

/// Separator between field values in the `flds` column.
pub const FIELD_SEPARATOR: char = '\x1f';

/// Sorted tag list, so that two notes with the same tags compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Tags(Vec<String>);
impl Tags {
    /// Split a space-delimited tag string. Tags are stored with leading and
    /// trailing spaces (` tag1 tag2 `), empties are dropped.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let mut tags: Vec<String> = s.split_whitespace().map(str::to_string).collect();
        tags.sort();
        Self(tags)
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.0.binary_search_by(|t| t.as_str().cmp(tag)).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A note's field values, in the order of its model's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldValues(Vec<String>);
impl FieldValues {
    #[must_use]
    pub fn split(blob: &str) -> Self {
        Self(blob.split(FIELD_SEPARATOR).map(str::to_string).collect())
    }

    /// Inverse of [`split`](Self::split).
    #[must_use]
    pub fn join(&self) -> String {
        self.0.join(&FIELD_SEPARATOR.to_string())
    }

    #[must_use]
    pub fn get(&self, ordinal: usize) -> Option<&str> {
        self.0.get(ordinal).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A row of the `notes` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: Id,
    /// Globally unique id, used for syncing.
    pub guid: String,
    pub model_id: Id,
    pub modified: Option<UtcDateTime>,
    pub usn: i64,
    pub tags: Tags,
    pub fields: FieldValues,
    /// Text of the sort field, used for duplicate detection.
    pub sort_field: String,
    /// Integer form of the first 8 hex digits of the SHA-1 of the first field.
    pub checksum: i64,
}
impl Note {
    /// Value of the field called `name`, located positionally through the
    /// note's model.
    #[must_use]
    pub fn field<'a>(&'a self, model: &Model, name: &str) -> Option<&'a str> {
        model.field(name).and_then(|field| self.fields.get(field.ordinal))
    }
}
impl TryFrom<&Row> for Note {
    type Error = Error;
    fn try_from(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.decode("id", coerce::id)?,
            guid: row.decode("guid", coerce::text)?,
            model_id: row.decode("mid", coerce::id)?,
            modified: row.decode("mod", coerce::seconds_timestamp)?,
            usn: row.decode("usn", coerce::integer)?,
            tags: row.decode("tags", coerce::tags)?,
            fields: row.decode("flds", coerce::field_values)?,
            sort_field: row.decode("sfld", coerce::text)?,
            checksum: row.decode("csum", coerce::integer)?,
        })
    }
}
