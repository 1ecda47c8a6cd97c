//! Raw scalar values as they come out of the package.
//!
//! The same logical number may arrive as an integer, a float, or numeric text
//! depending on the column affinity and on whether it was read from SQLite or
//! from one of the JSON columns. [`Value`] captures whatever was found and is
//! only ever interpreted by [`crate::coerce`].

use crate::coerce::Mismatch;
use crate::error::{ErrorKind, Result};
use serde::de::{Deserialize, Deserializer, Error as DeError, Visitor};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Longest text snippet echoed back in error messages.
const SNIPPET_CHARS: usize = 32;

/// A single undecoded scalar.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}
impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Storage class name, matching SQLite's vocabulary.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
        }
    }
}
impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Value::Null => write!(f, "null"),
            Value::Integer(i) => write!(f, "integer {i}"),
            Value::Real(r) => write!(f, "real {r}"),
            Value::Text(s) if s.chars().count() > SNIPPET_CHARS => {
                let snippet: String = s.chars().take(SNIPPET_CHARS).collect();
                write!(f, "text `{snippet}…`")
            },
            Value::Text(s) => write!(f, "text `{s}`"),
            Value::Blob(b) => write!(f, "blob ({} bytes)", b.len()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}
impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}
impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}
impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(value)
    }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;
impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("a scalar value")
    }

    // JSON booleans and 0/1 integers are interchangeable in the package.
    fn visit_bool<E: DeError>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn visit_i64<E: DeError>(self, v: i64) -> std::result::Result<Value, E> {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E: DeError>(self, v: u64) -> std::result::Result<Value, E> {
        Ok(i64::try_from(v).map_or(Value::Real(v as f64), Value::Integer))
    }

    fn visit_f64<E: DeError>(self, v: f64) -> std::result::Result<Value, E> {
        Ok(Value::Real(v))
    }

    fn visit_str<E: DeError>(self, v: &str) -> std::result::Result<Value, E> {
        Ok(Value::Text(v.to_string()))
    }

    fn visit_string<E: DeError>(self, v: String) -> std::result::Result<Value, E> {
        Ok(Value::Text(v))
    }

    fn visit_bytes<E: DeError>(self, v: &[u8]) -> std::result::Result<Value, E> {
        Ok(Value::Blob(v.to_vec()))
    }

    fn visit_byte_buf<E: DeError>(self, v: Vec<u8>) -> std::result::Result<Value, E> {
        Ok(Value::Blob(v))
    }

    fn visit_none<E: DeError>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_unit<E: DeError>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }
}

/// One result row: named values in select order.
///
/// Absent columns read as [`Value::Null`], so optional columns and legacy
/// schemas go through the same coercion rules as explicit nulls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}
impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.push((column.into(), value.into()));
    }

    /// Builder-style [`push`](Self::push), handy for tests.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    /// The raw value of a column, or `None` if the row has no such column.
    #[must_use]
    pub fn value(&self, column: &str) -> Option<&Value> {
        self.columns.iter().find(|(name, _)| name == column).map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Apply one of the [`crate::coerce`] rules to a column.
    ///
    /// Failures are reported as [`ErrorKind::Type`] naming the column.
    pub fn decode<T>(
        &self,
        column: &str,
        rule: impl FnOnce(&Value) -> std::result::Result<T, Mismatch>,
    ) -> Result<T> {
        rule(self.value(column).unwrap_or(&Value::Null))
            .map_err(|mismatch| exn::Exn::from(ErrorKind::column(column, mismatch)))
    }
}
impl<S: Into<String>, V: Into<Value>> FromIterator<(S, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        Self { columns: iter.into_iter().map(|(name, value)| (name.into(), value.into())).collect() }
    }
}
