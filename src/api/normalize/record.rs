//! Flat records produced from response elements

use indexmap::IndexMap;
use serde::Serialize;

/// Value of a single record field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    /// Compound field such as a money amount or a key/value list
    Map(IndexMap<String, String>),
    /// Repeated child values such as promotion ids
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, String>> {
        match self {
            FieldValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// One normalized list entry.
///
/// A field that the response did not carry is absent from the record; it is
/// never filled with a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Builder-style insert, mostly for constructing expectations
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Text value of a field, `None` if absent or compound
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Compound value of a field, `None` if absent or plain text
    pub fn map(&self, name: &str) -> Option<&IndexMap<String, String>> {
        self.get(name).and_then(FieldValue::as_map)
    }

    /// Repeated values of a field, `None` if absent or not a list
    pub fn list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(FieldValue::as_list)
    }

    /// One entry of a compound field, e.g. `("ItemPrice", "Amount")`
    pub fn map_value(&self, name: &str, key: &str) -> Option<&str> {
        self.map(name).and_then(|m| m.get(key)).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<IndexMap<String, String>> for FieldValue {
    fn from(value: IndexMap<String, String>) -> Self {
        FieldValue::Map(value)
    }
}
