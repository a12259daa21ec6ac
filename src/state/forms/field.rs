//! Field value and field error objects

use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

/// Plain field values, keyed by field name
pub type Values = serde_json::Map<String, serde_json::Value>;

/// Error message per field
///
/// A missing key and an empty message both mean "no error for that field".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the message recorded for a field, if any
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Set the message for a field, replacing any previous one
    pub fn set(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Clear a field's message (the key stays, holding an empty string)
    pub fn clear_field(&mut self, field: impl Into<String>) {
        self.0.insert(field.into(), String::new());
    }

    /// Returns true if the field carries a non-empty message
    pub fn has_error(&self, field: &str) -> bool {
        self.get(field).is_some_and(|m| !m.is_empty())
    }

    /// Returns true if any field carries a non-empty message
    pub fn has_any(&self) -> bool {
        self.0.values().any(|m| !m.is_empty())
    }

    /// Merge `other` on top of `self`: keys from `other` win, the rest of
    /// `self` is preserved.
    pub fn merged_with(&self, other: &FieldErrors) -> FieldErrors {
        let mut merged = self.clone();
        for (field, message) in other.iter() {
            merged.set(field, message);
        }
        merged
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for FieldErrors {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for FieldErrors {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
