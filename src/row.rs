//! Example rows
//!
//! One externally supplied example record: column names aligned by index
//! with literal values. Lookups are exact and case-sensitive.

use serde::{Deserialize, Serialize};

/// A single example record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub column_names: Vec<String>,
    pub values: Vec<String>,
}

impl Row {
    /// Build a row from aligned columns and values. Unpaired trailing
    /// entries on either side are ignored by lookups.
    pub fn new<C, V>(column_names: C, values: V) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Self {
            column_names: column_names.into_iter().map(Into::into).collect(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Literal bound to `name`, if any
    pub fn get_field(&self, name: &str) -> Option<&str> {
        self.column_names
            .iter()
            .zip(self.values.iter())
            .find(|(column, _)| column.as_str() == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.column_names.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let (column_names, values) = iter.into_iter().map(|(k, v)| (k.into(), v.into())).unzip();
        Self { column_names, values }
    }
}
