use crate::coerce;
use crate::value::Value;
use serde::de::{Deserialize, Deserializer, Error as DeError};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Identifier of any package object (note, card, deck, model, ...).
///
/// Most identifiers are creation timestamps in milliseconds, but nothing
/// depends on that. A missing identifier decodes to [`Id::EMPTY`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(pub i64);
impl Id {
    /// Sentinel for null or absent identifiers.
    pub const EMPTY: Id = Id(0);

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    #[must_use]
    pub fn get(&self) -> i64 {
        self.0
    }
}
impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id(value)
    }
}
impl From<Id> for Value {
    fn from(value: Id) -> Self {
        Value::Integer(value.0)
    }
}
impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}
impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        coerce::id(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1357356563296", Id(1357356563296))]
    #[case(r#""1357356563296""#, Id(1357356563296))]
    #[case("1357356563296.0", Id(1357356563296))]
    #[case("null", Id::EMPTY)]
    fn test_deserialize(#[case] json: &str, #[case] expected: Id) {
        assert_eq!(serde_json::from_str::<Id>(json).unwrap(), expected);
    }

    #[test]
    fn test_deserialize_rejects_words() {
        assert!(serde_json::from_str::<Id>(r#""default""#).is_err());
    }
}
