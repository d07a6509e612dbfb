//! Result rows and hydration.
//!
//! A [`Row`] keeps the column order of the statement that produced it.
//! [`FromRow`] turns a row into a typed model; `Row` implements it as the
//! identity, which is what a builder without a model type returns.

use crate::error::{Error, Result};
use crate::value::{TryGetable, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One result row: column name → value, in select order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    columns: IndexMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column; a repeated name overwrites the earlier value
    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.columns.insert(column.into(), value);
    }

    /// Raw value of a column, if present
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// Extract a typed value from a column
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnNotFound`] if the row has no such column and
    /// [`Error::InvalidValue`] if the value cannot be converted.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlwright::{Row, Value};
    ///
    /// let mut row = Row::new();
    /// row.insert("id", Value::Int(1));
    /// row.insert("name", Value::Text("test1".into()));
    ///
    /// let id: i64 = row.try_get("id")?;
    /// let name: Option<String> = row.try_get("name")?;
    /// assert_eq!((id, name.as_deref()), (1, Some("test1")));
    /// # Ok::<(), sqlwright::Error>(())
    /// ```
    pub fn try_get<T: TryGetable>(&self, column: &str) -> Result<T> {
        let value = self
            .columns
            .get(column)
            .cloned()
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))?;
        T::try_get(value).map_err(|source| Error::InvalidValue {
            column: column.to_string(),
            source,
        })
    }

    /// Column names in select order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.columns.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn into_map(self) -> IndexMap<String, Value> {
        self.columns
    }
}

impl From<IndexMap<String, Value>> for Row {
    fn from(columns: IndexMap<String, Value>) -> Self {
        Self { columns }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Build a value of this type from a result row
///
/// Usually derived with `#[derive(ActiveRecord)]`; implement it by hand for
/// read-only projections.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(row.clone())
    }
}

impl FromRow for IndexMap<String, Value> {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(row.columns.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueExtractionError;

    fn sample() -> Row {
        [("id", Value::Int(2)), ("name", Value::Text("test2".into()))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_columns_keep_select_order() {
        let row = sample();
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["id", "name"]);
    }

    #[test]
    fn test_try_get_missing_column() {
        let err = sample().try_get::<i64>("email").unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound(c) if c == "email"));
    }

    #[test]
    fn test_try_get_wrong_type_names_column() {
        let err = sample().try_get::<i64>("name").unwrap_err();
        match err {
            Error::InvalidValue { column, source } => {
                assert_eq!(column, "name");
                assert!(matches!(source, ValueExtractionError::TypeMismatch { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_row_serializes_as_object() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"id":2,"name":"test2"}"#);
    }
}
