//! Result rows.

use crate::error::{DalError, DalResult};
use crate::value::{FromValue, Value};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One returned row: column names paired with values, in select order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Build a row from parallel column/value vectors.
    ///
    /// Returns a decode error when the lengths differ.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> DalResult<Self> {
        if columns.len() != values.len() {
            return Err(DalError::decode(
                "*",
                format!(
                    "row has {} columns but {} values",
                    columns.len(),
                    values.len()
                ),
            ));
        }
        Ok(Self { columns, values })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Get a column value by name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.position(column).map(|i| &self.values[i])
    }

    /// Get a column value by index.
    pub fn get_idx(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    /// Get a column by name and convert it.
    pub fn try_get<T: FromValue>(&self, column: &str) -> DalResult<T> {
        let value = self
            .get(column)
            .cloned()
            .ok_or_else(|| DalError::decode(column, "no such column in row"))?;
        T::from_value(value, column)
    }

    /// Take a column value out of the row by name.
    pub fn into_value(mut self, column: &str) -> DalResult<Value> {
        match self.position(column) {
            Some(i) => Ok(self.values.swap_remove(i)),
            None => Err(DalError::decode(column, "no such column in row")),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
