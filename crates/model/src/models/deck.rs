use crate::coerce::{Keyed, de};
use crate::models::DeckConfig;
use crate::Id;
use serde::Deserialize;
use time::UtcDateTime;

/// A `[day, count]` pair kept per deck for the daily limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "(i64, i64)")]
pub struct DayCount {
    /// Days since the collection was created.
    pub day: i64,
    pub count: i64,
}
impl From<(i64, i64)> for DayCount {
    fn from((day, count): (i64, i64)) -> Self {
        Self { day, count }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Deck {
    pub id: Id,
    /// Full name; `::` separates parent and child decks.
    pub name: String,
    #[serde(default, rename = "desc")]
    pub description: String,
    #[serde(default, rename = "mod", deserialize_with = "de::seconds_timestamp")]
    pub modified: Option<UtcDateTime>,
    #[serde(default)]
    pub usn: i64,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default, rename = "browserCollapsed")]
    pub browser_collapsed: bool,
    #[serde(default, rename = "extendedNew")]
    pub extended_new_limit: i64,
    #[serde(default, rename = "extendedRev")]
    pub extended_review_limit: i64,
    /// Filtered decks borrow cards from other decks and have no option group.
    #[serde(default, rename = "dyn", deserialize_with = "de::flag")]
    pub dynamic: bool,
    #[serde(default, rename = "conf")]
    pub config_id: Id,
    #[serde(default, rename = "newToday")]
    pub new_today: DayCount,
    #[serde(default, rename = "revToday")]
    pub reviews_today: DayCount,
    #[serde(default, rename = "lrnToday")]
    pub learn_today: DayCount,
    /// Count is in milliseconds.
    #[serde(default, rename = "timeToday")]
    pub time_today: DayCount,
    /// Resolved from the collection's deck configs while it is assembled.
    #[serde(skip)]
    pub config: Option<DeckConfig>,
}
impl Deck {
    /// Name segments from the top-level deck down.
    pub fn path(&self) -> impl Iterator<Item = &str> {
        self.name.split("::")
    }
}
impl Keyed for Deck {
    fn id(&self) -> Id {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_deck() {
        let json = r#"{
            "desc": "", "name": "Languages::German", "extendedRev": 50, "usn": 0,
            "collapsed": false, "newToday": [366, 4], "timeToday": [366, 61200],
            "dyn": 0, "extendedNew": 10, "conf": 1, "revToday": [366, 0],
            "lrnToday": [366, 0], "id": 1388721626870, "mod": 1388721680
        }"#;
        let deck: Deck = serde_json::from_str(json).unwrap();
        assert_eq!(deck.id, Id(1388721626870));
        assert!(!deck.dynamic);
        assert_eq!(deck.config_id, Id(1));
        assert_eq!(deck.new_today, DayCount { day: 366, count: 4 });
        assert_eq!(deck.time_today.count, 61200);
        assert_eq!(deck.path().collect::<Vec<_>>(), vec!["Languages", "German"]);
        assert!(deck.config.is_none());
    }

    #[test]
    fn test_filtered_deck_without_config() {
        let json = r#"{"id": 9, "name": "Cram", "dyn": 1}"#;
        let deck: Deck = serde_json::from_str(json).unwrap();
        assert!(deck.dynamic);
        assert!(deck.config_id.is_empty());
    }
}
