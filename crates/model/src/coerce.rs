//! Decode rules from raw [`Value`]s into domain scalars.
//!
//! Every rule is a plain `fn(&Value) -> Result<T, Mismatch>`. Rows apply them
//! through [`Row::decode`](crate::Row::decode), which attaches the column
//! name; JSON columns apply the very same rules through the serde adapters in
//! [`de`].

use crate::models::{FieldValues, Tags};
use crate::schedule;
use crate::{Id, Value};
use derive_more::{Display, Error};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use time::{Duration, UtcDateTime};

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_DAY: i64 = 24 * 60 * MILLIS_PER_MINUTE;
const NANOS_PER_MILLI: i128 = 1_000_000;

/// A value that doesn't fit the requested rule.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
#[display("expected {expected}, found {found}")]
pub struct Mismatch {
    expected: &'static str,
    found: String,
}
impl Mismatch {
    pub(crate) fn new(expected: &'static str, found: &Value) -> Self {
        Self { expected, found: found.to_string() }
    }
}

/// Integer view of a numeric value. Reals are truncated toward zero, the
/// same way the package's own tooling reads them back.
fn whole(value: &Value, accept_text: bool) -> Option<i64> {
    match value {
        Value::Integer(i) => Some(*i),
        Value::Real(r) if r.is_finite() => Some(r.trunc() as i64),
        Value::Text(s) if accept_text => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|r| r.is_finite()).map(|r| r.trunc() as i64))
        },
        _ => None,
    }
}

fn scaled(value: &Value, expected: &'static str, millis_per_unit: i64) -> Result<Duration, Mismatch> {
    let duration = match value {
        Value::Integer(i) => i.checked_mul(millis_per_unit).map(Duration::milliseconds),
        Value::Real(r) => Duration::checked_seconds_f64(r * (millis_per_unit as f64 / 1000.0)),
        _ => None,
    };
    duration.ok_or_else(|| Mismatch::new(expected, value))
}

/// Integer or numeric text; null means [`Id::EMPTY`].
pub fn id(value: &Value) -> Result<Id, Mismatch> {
    if value.is_null() {
        return Ok(Id::EMPTY);
    }
    whole(value, true).map(Id).ok_or_else(|| Mismatch::new("identifier", value))
}

/// Any numeric representation, including numeric text.
pub fn integer(value: &Value) -> Result<i64, Mismatch> {
    whole(value, true).ok_or_else(|| Mismatch::new("integer", value))
}

pub fn real(value: &Value) -> Result<f64, Mismatch> {
    match value {
        Value::Integer(i) => Ok(*i as f64),
        Value::Real(r) => Ok(*r),
        Value::Text(s) => s.trim().parse::<f64>().map_err(|_| Mismatch::new("real", value)),
        _ => Err(Mismatch::new("real", value)),
    }
}

/// Text as-is; numbers are rendered (the sort field column has numeric
/// affinity); blobs must be UTF-8.
pub fn text(value: &Value) -> Result<String, Mismatch> {
    match value {
        Value::Text(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Real(r) => Ok(r.to_string()),
        Value::Blob(b) => String::from_utf8(b.clone()).map_err(|_| Mismatch::new("UTF-8 text", value)),
        Value::Null => Err(Mismatch::new("text", value)),
    }
}

/// Seconds since the Unix epoch; null is unset.
pub fn seconds_timestamp(value: &Value) -> Result<Option<UtcDateTime>, Mismatch> {
    if value.is_null() {
        return Ok(None);
    }
    whole(value, true)
        .and_then(|secs| UtcDateTime::from_unix_timestamp(secs).ok())
        .map(Some)
        .ok_or_else(|| Mismatch::new("timestamp in seconds", value))
}

/// Milliseconds since the Unix epoch; null is unset.
pub fn millis_timestamp(value: &Value) -> Result<Option<UtcDateTime>, Mismatch> {
    if value.is_null() {
        return Ok(None);
    }
    whole(value, true)
        .and_then(|ms| UtcDateTime::from_unix_timestamp_nanos(i128::from(ms) * NANOS_PER_MILLI).ok())
        .map(Some)
        .ok_or_else(|| Mismatch::new("timestamp in milliseconds", value))
}

/// Raw `ivl` column: integers and reals only, since its sign picks the unit.
/// Returns seconds, see [`schedule::interval`].
pub fn interval(value: &Value) -> Result<i64, Mismatch> {
    whole(value, false).map(schedule::interval).ok_or_else(|| Mismatch::new("interval", value))
}

pub fn seconds_duration(value: &Value) -> Result<Duration, Mismatch> {
    scaled(value, "number of seconds", MILLIS_PER_SECOND)
}

/// Minutes, fractions allowed (learning steps such as `0.5`).
pub fn minutes_duration(value: &Value) -> Result<Duration, Mismatch> {
    scaled(value, "number of minutes", MILLIS_PER_MINUTE)
}

pub fn days_duration(value: &Value) -> Result<Duration, Mismatch> {
    scaled(value, "number of days", MILLIS_PER_DAY)
}

pub fn millis_duration(value: &Value) -> Result<Duration, Mismatch> {
    scaled(value, "number of milliseconds", 1)
}

/// Ease factor stored in permille, e.g. `2500` is a multiplier of `2.5`.
pub fn factor(value: &Value) -> Result<f64, Mismatch> {
    real(value).map(schedule::factor)
}

/// 0/1 integer flag. Null is false, any other number is true.
pub fn flag(value: &Value) -> Result<bool, Mismatch> {
    match value {
        Value::Null => Ok(false),
        Value::Integer(i) => Ok(*i != 0),
        Value::Real(r) => Ok(*r != 0.0),
        _ => Err(Mismatch::new("0/1 flag", value)),
    }
}

/// Space-delimited tags, sorted. Null means no tags.
pub fn tags(value: &Value) -> Result<Tags, Mismatch> {
    if value.is_null() {
        return Ok(Tags::default());
    }
    text(value).map(|s| Tags::parse(&s))
}

pub fn field_values(value: &Value) -> Result<FieldValues, Mismatch> {
    text(value).map(|s| FieldValues::split(&s))
}

/// JSON stored in a text (or blob) column.
pub fn json<T: DeserializeOwned>(value: &Value) -> Result<T, Mismatch> {
    let parsed = match value {
        Value::Text(s) => serde_json::from_str(s),
        Value::Blob(b) => serde_json::from_slice(b),
        _ => return Err(Mismatch::new("JSON text", value)),
    };
    parsed.map_err(|err| Mismatch { expected: "valid JSON", found: err.to_string() })
}

/// Objects that carry their own identifier inside a keyed JSON map.
pub trait Keyed {
    fn id(&self) -> Id;
}

/// A JSON object of `{"<id>": {"id": <id>, ...}}`, re-keyed by the decoded
/// `id` of each value. The string keys are ignored.
pub fn keyed_json<T: DeserializeOwned + Keyed>(value: &Value) -> Result<HashMap<Id, T>, Mismatch> {
    let map: HashMap<String, T> = json(value)?;
    Ok(map.into_values().map(|item| (item.id(), item)).collect())
}

/// Serde `deserialize_with` adapters running the same rules on JSON members.
pub mod de {
    use crate::Value;
    use serde::de::{Deserialize, Deserializer, Error as DeError};
    use time::{Duration, UtcDateTime};

    macro_rules! adapter {
        ($name:ident, $out:ty) => {
            pub fn $name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<$out, D::Error> {
                let value = Value::deserialize(deserializer)?;
                super::$name(&value).map_err(D::Error::custom)
            }
        };
    }

    macro_rules! list_adapter {
        ($name:ident, $rule:ident) => {
            pub fn $name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Duration>, D::Error> {
                Vec::<Value>::deserialize(deserializer)?
                    .iter()
                    .map(|value| super::$rule(value).map_err(D::Error::custom))
                    .collect()
            }
        };
    }

    adapter!(seconds_timestamp, Option<UtcDateTime>);
    adapter!(seconds_duration, Duration);
    adapter!(days_duration, Duration);
    adapter!(flag, bool);
    adapter!(factor, f64);
    list_adapter!(minutes_list, minutes_duration);
    list_adapter!(days_list, days_duration);
}
