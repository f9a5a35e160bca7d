//! Bind values and field mappings.

use crate::error::{DalError, DalResult};
use serde::{Serialize, Serializer};

/// A driver-agnostic value, used both for binds and for result columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(v) => Some(v),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Text(v) => serializer.serialize_str(v),
            Value::Blob(v) => v.serialize(serializer),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Integer(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Blob(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Conversion from a result [`Value`] into a Rust type.
pub trait FromValue: Sized {
    /// `column` is only used for error reporting.
    fn from_value(value: Value, column: &str) -> DalResult<Self>;
}

fn mismatch(column: &str, expected: &str, value: &Value) -> DalError {
    DalError::decode(
        column,
        format!("expected {expected}, got {}", value.type_name()),
    )
}

impl FromValue for Value {
    fn from_value(value: Value, _column: &str) -> DalResult<Self> {
        Ok(value)
    }
}

impl FromValue for i64 {
    fn from_value(value: Value, column: &str) -> DalResult<Self> {
        match value {
            Value::Integer(v) => Ok(v),
            other => Err(mismatch(column, "integer", &other)),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value, column: &str) -> DalResult<Self> {
        let v = i64::from_value(value, column)?;
        i32::try_from(v).map_err(|_| DalError::decode(column, format!("{v} out of range for i32")))
    }
}

impl FromValue for bool {
    fn from_value(value: Value, column: &str) -> DalResult<Self> {
        match value {
            Value::Integer(v) => Ok(v != 0),
            other => Err(mismatch(column, "integer", &other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value, column: &str) -> DalResult<Self> {
        value
            .as_f64()
            .ok_or_else(|| mismatch(column, "float", &value))
    }
}

impl FromValue for String {
    fn from_value(value: Value, column: &str) -> DalResult<Self> {
        match value {
            Value::Text(v) => Ok(v),
            other => Err(mismatch(column, "text", &other)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value, column: &str) -> DalResult<Self> {
        match value {
            Value::Blob(v) => Ok(v),
            other => Err(mismatch(column, "blob", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value, column: &str) -> DalResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other, column).map(Some),
        }
    }
}

/// An ordered name → value mapping with unique names.
///
/// Used both as data to write and as equality conditions to match. Insertion
/// order determines clause order in generated SQL; re-setting an existing name
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, Value)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field (consuming builder form).
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Apply `other` on top of `self`; values from `other` win on name collisions.
    pub fn merge(mut self, other: &Fields) -> Self {
        for (name, value) in other.iter() {
            self.insert(name, value.clone());
        }
        self
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Fields {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// Ordered ORDER BY column list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBy {
    items: Vec<(String, Direction)>,
}

impl OrderBy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn asc(mut self, column: impl Into<String>) -> Self {
        self.items.push((column.into(), Direction::Asc));
        self
    }

    pub fn desc(mut self, column: impl Into<String>) -> Self {
        self.items.push((column.into(), Direction::Desc));
        self
    }

    pub fn push(&mut self, column: impl Into<String>, direction: Direction) {
        self.items.push((column.into(), direction));
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Direction)> {
        self.items.iter().map(|(c, d)| (c.as_str(), *d))
    }
}
