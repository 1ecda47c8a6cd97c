use crate::coerce::de;
use crate::Id;
use serde::Deserialize;
use time::Duration;

/// Global options, stored as JSON in `col.conf`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "nextPos")]
    pub next_pos: i64,
    #[serde(rename = "estTimes")]
    pub estimate_times: bool,
    #[serde(rename = "activeDecks")]
    pub active_decks: Vec<Id>,
    #[serde(rename = "sortType")]
    pub sort_type: String,
    #[serde(rename = "timeLim", alias = "timeLimit", deserialize_with = "de::seconds_duration")]
    pub time_limit: Duration,
    #[serde(rename = "sortBackwards")]
    pub sort_backwards: bool,
    /// Add new cards to the current deck rather than the model's deck.
    #[serde(rename = "addToCur")]
    pub add_to_current: bool,
    #[serde(rename = "curDeck")]
    pub current_deck: Id,
    #[serde(rename = "newBury")]
    pub new_bury: bool,
    #[serde(rename = "newSpread")]
    pub new_spread: i64,
    #[serde(rename = "dueCounts")]
    pub due_counts: bool,
    #[serde(rename = "curModel")]
    pub current_model: Id,
    /// Learning cards due within this window are shown early.
    #[serde(rename = "collapseTime", deserialize_with = "de::seconds_duration")]
    pub collapse_time: Duration,
}
