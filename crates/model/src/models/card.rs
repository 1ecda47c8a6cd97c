use crate::coerce::{self, Mismatch};
use crate::error::Result;
use crate::{Id, Row, Value, schedule};
use time::{Duration, UtcDateTime};

/// Left values pack two counters: `a * 1000 + b`.
const LEFT_SPLIT: i64 = 1000;

int_enum! {
    /// Learning stage of a card; decides how `due` is encoded.
    pub enum CardType {
        New = 0,
        Learning = 1,
        Review = 2,
        Relearning = 3,
    }
}

int_enum! {
    pub enum CardQueue {
        /// Buried by the scheduler as a sibling of a reviewed card.
        SchedBuried = -3,
        /// Buried by the user.
        Buried = -2,
        Suspended = -1,
        New = 0,
        Learning = 1,
        Review = 2,
        /// In learning, with steps of a day or more.
        DayLearning = 3,
        Preview = 4,
    }
}

/// A row of the `cards` table, with scheduling columns in one consistent
/// representation.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: Id,
    pub note_id: Id,
    pub deck_id: Id,
    /// Template ordinal (or cloze number) within the note's model.
    pub ordinal: i64,
    pub modified: Option<UtcDateTime>,
    pub usn: i64,
    pub kind: CardType,
    pub queue: CardQueue,
    /// Unset for new cards.
    pub due: Option<UtcDateTime>,
    /// Unset until the card has been answered.
    pub interval: Option<Duration>,
    /// Ease as a multiplier.
    pub factor: f64,
    pub reviews: i64,
    pub lapses: i64,
    pub left: i64,
    /// Due time before the card was moved into a filtered deck.
    pub original_due: Option<UtcDateTime>,
    pub original_deck_id: Id,
}
impl Card {
    /// Decode a card row. `created` is the collection creation time in
    /// seconds since the epoch, which review-card due days are counted from.
    pub fn from_row(row: &Row, created: i64) -> Result<Self> {
        let kind = row.decode("type", CardType::from_value)?;
        Ok(Self {
            id: row.decode("id", coerce::id)?,
            note_id: row.decode("nid", coerce::id)?,
            deck_id: row.decode("did", coerce::id)?,
            ordinal: row.decode("ord", coerce::integer)?,
            modified: row.decode("mod", coerce::seconds_timestamp)?,
            usn: row.decode("usn", coerce::integer)?,
            kind,
            queue: row.decode("queue", CardQueue::from_value)?,
            due: row.decode("due", |value| {
                let raw = coerce::integer(value)?;
                instant(schedule::due(kind, raw, created), value)
            })?,
            interval: row.decode("ivl", |value| {
                let secs = coerce::interval(value)?;
                Ok((secs != 0).then(|| Duration::seconds(secs)))
            })?,
            factor: row.decode("factor", coerce::factor)?,
            reviews: row.decode("reps", coerce::integer)?,
            lapses: row.decode("lapses", coerce::integer)?,
            left: row.decode("left", coerce::integer)?,
            original_due: row.decode("odue", |value| match coerce::integer(value)? {
                0 => Ok(None),
                raw => instant(schedule::due(kind, raw, created), value),
            })?,
            original_deck_id: row.decode("odid", coerce::id)?,
        })
    }

    /// Learning steps that can still be completed today.
    #[must_use]
    pub fn remaining_today(&self) -> i64 {
        self.left / LEFT_SPLIT
    }

    /// Learning steps left until the card graduates.
    #[must_use]
    pub fn remaining_steps(&self) -> i64 {
        self.left % LEFT_SPLIT
    }

    #[must_use]
    pub fn is_in_filtered_deck(&self) -> bool {
        !self.original_deck_id.is_empty()
    }
}

fn instant(secs: i64, value: &Value) -> std::result::Result<Option<UtcDateTime>, Mismatch> {
    if secs == 0 {
        return Ok(None);
    }
    UtcDateTime::from_unix_timestamp(secs)
        .map(Some)
        .map_err(|_| Mismatch::new("due time within range", value))
}
