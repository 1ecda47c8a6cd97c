use crate::error::{Error, ErrorKind, Result};
use crate::models::{Config, Deck, DeckConfig, Model};
use crate::{Id, Row, coerce};
use std::collections::HashMap;
use time::UtcDateTime;

/// The singleton `col` row: global settings plus every model, deck and deck
/// configuration, keyed by their ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub id: Id,
    pub created: Option<UtcDateTime>,
    pub modified: Option<UtcDateTime>,
    /// A newer schema modification forces a full sync.
    pub schema_modified: Option<UtcDateTime>,
    pub version: i64,
    /// Kept for completeness; nothing reads it any more.
    pub dirty: bool,
    pub update_sequence: i64,
    pub last_sync: Option<UtcDateTime>,
    pub config: Config,
    pub models: HashMap<Id, Model>,
    pub decks: HashMap<Id, Deck>,
    pub deck_configs: HashMap<Id, DeckConfig>,
    /// Tag cache, as stored.
    pub tags: String,
}
impl Collection {
    #[must_use]
    pub fn model(&self, id: Id) -> Option<&Model> {
        self.models.get(&id)
    }

    #[must_use]
    pub fn deck(&self, id: Id) -> Option<&Deck> {
        self.decks.get(&id)
    }

    /// Drop decks that have been deleted, returning how many were removed.
    pub fn remove_decks(&mut self, deleted: impl IntoIterator<Item = Id>) -> usize {
        deleted.into_iter().filter(|id| self.decks.remove(id).is_some()).count()
    }

    /// Attach each deck's configuration.
    ///
    /// Filtered decks without a configuration reference get none; any other
    /// reference that doesn't resolve is an [`ErrorKind::Integrity`] error.
    pub fn resolve_deck_configs(&mut self) -> Result<()> {
        let mut ids: Vec<Id> = self.decks.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            let Some(deck) = self.decks.get_mut(&id) else { continue };
            if deck.dynamic && deck.config_id.is_empty() {
                tracing::trace!(deck = %deck.id, "filtered deck without config");
                deck.config = None;
                continue;
            }
            let Some(config) = self.deck_configs.get(&deck.config_id) else {
                exn::bail!(ErrorKind::Integrity { deck: deck.id, config: deck.config_id });
            };
            deck.config = Some(config.clone());
        }
        Ok(())
    }
}
impl TryFrom<&Row> for Collection {
    type Error = Error;
    fn try_from(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.decode("id", coerce::id)?,
            created: row.decode("crt", coerce::seconds_timestamp)?,
            modified: row.decode("mod", coerce::millis_timestamp)?,
            schema_modified: row.decode("scm", coerce::millis_timestamp)?,
            version: row.decode("ver", coerce::integer)?,
            dirty: row.decode("dty", coerce::flag)?,
            update_sequence: row.decode("usn", coerce::integer)?,
            last_sync: row.decode("ls", coerce::millis_timestamp)?,
            config: row.decode("conf", coerce::json)?,
            models: row.decode("models", coerce::keyed_json)?,
            decks: row.decode("decks", coerce::keyed_json)?,
            deck_configs: row.decode("dconf", coerce::keyed_json)?,
            tags: row.decode("tags", coerce::text)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::Duration;

    const DECKS: &str = r#"{
        "1": {"id": 1, "name": "Default", "conf": 1, "dyn": 0},
        "1388721626870": {"id": 1388721626870, "name": "German", "conf": 1, "dyn": 0},
        "1388721700000": {"id": 1388721700000, "name": "Cram", "dyn": 1}
    }"#;
    const DECK_CONFIGS: &str = r#"{"1": {"id": 1, "name": "Default", "maxTaken": 60}}"#;

    fn row(decks: &str) -> Row {
        Row::new()
            .with("id", 1_i64)
            .with("crt", 1357304400_i64)
            .with("mod", 1388721770156_i64)
            .with("scm", 1388721663279_i64)
            .with("ver", 11_i64)
            .with("dty", 0_i64)
            .with("usn", 0_i64)
            .with("ls", 0_i64)
            .with("conf", r#"{"collapseTime": 1200, "curModel": "1357356563296"}"#)
            .with("models", "{}")
            .with("decks", decks)
            .with("dconf", DECK_CONFIGS)
            .with("tags", "{}")
    }

    #[test]
    fn test_row_to_collection() {
        let collection = Collection::try_from(&row(DECKS)).unwrap();
        assert_eq!(collection.created.unwrap().unix_timestamp(), 1357304400);
        assert_eq!(collection.modified.unwrap().unix_timestamp(), 1388721770);
        assert_eq!(collection.config.collapse_time, Duration::seconds(1200));
        assert_eq!(collection.decks.len(), 3);
        assert!(!collection.dirty);
    }

    #[test]
    fn test_resolve_deck_configs() {
        let mut collection = Collection::try_from(&row(DECKS)).unwrap();
        collection.resolve_deck_configs().unwrap();
        let german = collection.deck(Id(1388721626870)).unwrap();
        assert_eq!(german.config.as_ref().map(|c| c.max_answer_time), Some(Duration::seconds(60)));
        assert!(collection.deck(Id(1388721700000)).unwrap().config.is_none());
    }

    #[rstest]
    #[case(r#"{"5": {"id": 5, "name": "Orphan", "conf": 42}}"#)]
    #[case(r#"{"5": {"id": 5, "name": "Orphan", "conf": 42, "dyn": 1}}"#)]
    fn test_dangling_config_reference(#[case] decks: &str) {
        let mut collection = Collection::try_from(&row(decks)).unwrap();
        let err = collection.resolve_deck_configs().unwrap_err();
        assert_eq!(*err, ErrorKind::Integrity { deck: Id(5), config: Id(42) });
    }

    #[test]
    fn test_remove_decks() {
        let mut collection = Collection::try_from(&row(DECKS)).unwrap();
        assert_eq!(collection.remove_decks([Id(1388721626870), Id(999)]), 1);
        assert!(collection.deck(Id(1388721626870)).is_none());
    }

    #[test]
    fn test_malformed_json_names_column() {
        let broken = row("{not json");
        let err = Collection::try_from(&broken).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Type { column, .. } if column == "decks"));
    }
}
