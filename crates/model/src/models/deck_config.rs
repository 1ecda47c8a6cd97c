use crate::coerce::{Keyed, de};
use crate::Id;
use serde::Deserialize;
use time::{Duration, UtcDateTime};

int_enum! {
    /// What happens to a card once it becomes a leech.
    pub enum LeechAction {
        Suspend = 0,
        TagOnly = 1,
    }
}
impl Default for LeechAction {
    fn default() -> Self {
        Self::Suspend
    }
}

int_enum! {
    pub enum NewCardOrder {
        Added = 0,
        Random = 1,
    }
}
impl Default for NewCardOrder {
    fn default() -> Self {
        Self::Added
    }
}

/// Scheduling options shared by every deck that uses this option group.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeckConfig {
    pub id: Id,
    pub name: String,
    /// Replay question audio when the answer is shown.
    #[serde(default, rename = "replayq")]
    pub replay_audio: bool,
    #[serde(default, rename = "timer", deserialize_with = "de::flag")]
    pub show_timer: bool,
    /// Answers taking longer than this are recorded as this long.
    #[serde(default, rename = "maxTaken", deserialize_with = "de::seconds_duration")]
    pub max_answer_time: Duration,
    #[serde(default, rename = "mod", deserialize_with = "de::seconds_timestamp")]
    pub modified: Option<UtcDateTime>,
    #[serde(default)]
    pub autoplay: bool,
    #[serde(default)]
    pub usn: i64,
    #[serde(default)]
    pub lapse: LapseConfig,
    #[serde(default, rename = "rev")]
    pub review: ReviewConfig,
    #[serde(default)]
    pub new: NewConfig,
}
impl Keyed for DeckConfig {
    fn id(&self) -> Id {
        self.id
    }
}

/// Options for cards that were forgotten.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LapseConfig {
    #[serde(rename = "leechFails")]
    pub leech_fails: u32,
    #[serde(rename = "minInt", deserialize_with = "de::days_duration")]
    pub minimum_interval: Duration,
    #[serde(rename = "leechAction")]
    pub leech_action: LeechAction,
    /// Relearning steps.
    #[serde(deserialize_with = "de::minutes_list")]
    pub delays: Vec<Duration>,
    /// Multiplier applied to the previous interval.
    #[serde(rename = "mult")]
    pub new_interval: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    #[serde(rename = "perDay")]
    pub per_day: u32,
    pub fuzz: f64,
    #[serde(rename = "ivlFct")]
    pub interval_modifier: f64,
    #[serde(rename = "maxIvl", deserialize_with = "de::days_duration")]
    pub max_interval: Duration,
    #[serde(rename = "ease4")]
    pub easy_bonus: f64,
    /// Bury related reviews until the next day.
    pub bury: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewConfig {
    #[serde(rename = "perDay")]
    pub per_day: u32,
    /// Learning steps.
    #[serde(deserialize_with = "de::minutes_list")]
    pub delays: Vec<Duration>,
    pub bury: bool,
    pub separate: bool,
    /// Graduating, easy, and (unused) third interval.
    #[serde(rename = "ints", deserialize_with = "de::days_list")]
    pub intervals: Vec<Duration>,
    /// Starting ease as a multiplier (stored in permille).
    #[serde(rename = "initialFactor", deserialize_with = "de::factor")]
    pub initial_factor: f64,
    pub order: NewCardOrder,
}
