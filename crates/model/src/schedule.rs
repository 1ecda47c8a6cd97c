//! Scheduling column normalization.
//!
//! Cards and reviews store `due`, `ivl` and `factor` in representations that
//! depend on the card type and on the sign of the value. These functions turn
//! them into one consistent unit (seconds since the epoch, seconds, and a
//! plain multiplier) and are the only place that knows the encodings.

use crate::models::CardType;

pub const SECONDS_PER_DAY: i64 = 86_400;
const FACTOR_SCALE: f64 = 1000.0;

/// Due time in seconds since the epoch; `0` when not meaningful.
///
/// - new cards: the raw value is a queue position, so `0`; the same goes
///   for card types without a named variant;
/// - learning/relearning cards: already seconds since the epoch;
/// - review cards: days since the collection was created (`created`, in
///   seconds since the epoch).
#[must_use]
pub fn due(kind: CardType, raw: i64, created: i64) -> i64 {
    match kind {
        CardType::New | CardType::Other(_) => 0,
        CardType::Learning | CardType::Relearning => raw,
        CardType::Review => raw.saturating_mul(SECONDS_PER_DAY).saturating_add(created),
    }
}

/// Interval in seconds, never negative.
///
/// Negative raw values are seconds stored negated, positive raw values are
/// days. Zero stays zero (unset).
#[must_use]
pub fn interval(raw: i64) -> i64 {
    if raw < 0 { raw.saturating_neg() } else { raw.saturating_mul(SECONDS_PER_DAY) }
}

/// Real multiplier from a permille ease factor.
#[must_use]
pub fn factor(raw: f64) -> f64 {
    raw / FACTOR_SCALE
}
