//! Ordered column-name to value map.
//!
//! [`NamedRow`] is a thin wrapper around [`IndexMap`] that keeps columns in
//! document order. It is produced by [`Document::named_rows`](crate::Document::named_rows)
//! and is what struct and map elements are flattened into while marshaling,
//! so that the header and every row agree on column order. It serializes as a
//! map, so a list of named rows can be written back with a header.
//!
//! ## Examples
//!
//! ```rust
//! use csv_dialect::NamedRow;
//!
//! let mut row = NamedRow::new();
//! row.insert("name".to_string(), "Alice".to_string());
//! row.insert("age".to_string(), "30".to_string());
//!
//! assert_eq!(row.len(), 2);
//! assert_eq!(row.get("name"), Some("Alice"));
//! assert_eq!(row.keys().collect::<Vec<_>>(), vec!["name", "age"]);
//! ```

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Values of one record keyed by column name, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NamedRow(IndexMap<String, String>);

impl NamedRow {
    #[must_use]
    pub fn new() -> Self {
        NamedRow(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        NamedRow(IndexMap::with_capacity(capacity))
    }

    /// Zips header names with the fields of a row.
    ///
    /// Extra fields without a name are dropped. A repeated header name keeps
    /// its first position and the last value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use csv_dialect::NamedRow;
    ///
    /// let header = vec!["a".to_string(), "b".to_string()];
    /// let row = vec!["1".to_string()];
    /// let named = NamedRow::from_pairs(&header, &row);
    /// assert_eq!(named.get("a"), Some("1"));
    /// assert_eq!(named.get("b"), None);
    /// ```
    #[must_use]
    pub fn from_pairs(header: &[String], row: &[String]) -> Self {
        header
            .iter()
            .zip(row)
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Inserts a column value. If the column was present, the old value is returned.
    pub fn insert(&mut self, column: String, value: String) -> Option<String> {
        self.0.insert(column, value)
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column names, in column order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Values, in column order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Splits into a header and a row.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        self.0.into_iter().unzip()
    }
}

impl From<NamedRow> for HashMap<String, String> {
    fn from(row: NamedRow) -> Self {
        row.0.into_iter().collect()
    }
}

impl Serialize for NamedRow {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (column, value) in &self.0 {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl IntoIterator for NamedRow {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, String)> for NamedRow {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        NamedRow(IndexMap::from_iter(iter))
    }
}
