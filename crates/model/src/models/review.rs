use crate::coerce::{self, Mismatch};
use crate::error::{Error, Result};
use crate::{Id, Row, Value};
use time::{Duration, UtcDateTime};

int_enum! {
    /// Answer button pressed.
    pub enum ReviewEase {
        /// Rescheduled by hand rather than answered.
        Manual = 0,
        Wrong = 1,
        Hard = 2,
        Good = 3,
        Easy = 4,
    }
}

int_enum! {
    pub enum ReviewKind {
        Learn = 0,
        Review = 1,
        Relearn = 2,
        /// Answered early from a filtered deck.
        Filtered = 3,
        Manual = 4,
        /// Moved to another day by hand.
        Rescheduled = 5,
    }
}

/// A row of the `revlog` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: Id,
    /// When the answer was given; the id is a millisecond timestamp.
    pub timestamp: UtcDateTime,
    pub card_id: Id,
    pub usn: i64,
    pub ease: ReviewEase,
    pub interval: Duration,
    pub last_interval: Duration,
    pub factor: f64,
    pub time_taken: Duration,
    pub kind: ReviewKind,
}
impl TryFrom<&Row> for Review {
    type Error = Error;
    fn try_from(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.decode("id", coerce::id)?,
            timestamp: row.decode("id", |value| {
                coerce::millis_timestamp(value)?.ok_or_else(|| Mismatch::new("timestamp in milliseconds", value))
            })?,
            card_id: row.decode("cid", coerce::id)?,
            usn: row.decode("usn", coerce::integer)?,
            ease: row.decode("ease", ReviewEase::from_value)?,
            interval: row.decode("ivl", interval)?,
            last_interval: row.decode("lastIvl", interval)?,
            factor: row.decode("factor", coerce::factor)?,
            time_taken: row.decode("time", coerce::millis_duration)?,
            kind: row.decode("type", ReviewKind::from_value)?,
        })
    }
}

fn interval(value: &Value) -> std::result::Result<Duration, Mismatch> {
    coerce::interval(value).map(Duration::seconds)
}
