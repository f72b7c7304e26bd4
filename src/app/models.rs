//! Data models for parsed GenBank records
//!
//! A record is a mapping from field name to [`Value`]. Values nest freely;
//! maps are keyed by an optional subfield name where `None` is the slot for
//! content that belongs to the field itself rather than to a subfield.

use crate::constants::IDENTIFIER_FIELD;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Map keyed by subfield name; `None` holds the field's own value
pub type ValueMap = BTreeMap<Option<String>, Value>;

/// A structured value produced by a field converter
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Flag(bool),
    List(Vec<Value>),
    Map(ValueMap),
}

impl Value {
    /// Create a text value
    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    /// Create an empty map value
    pub fn empty_map() -> Self {
        Value::Map(ValueMap::new())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Value::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Look up a key in a map value
    ///
    /// Returns `None` for non-map values and for missing keys.
    pub fn get(&self, key: Option<&str>) -> Option<&Value> {
        self.as_map()
            .and_then(|map| map.get(&key.map(str::to_string)))
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Flag(flag)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(text) => serializer.serialize_str(text),
            Value::Flag(flag) => serializer.serialize_bool(*flag),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                // JSON object keys must be strings; the field's own slot is written as "null"
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key.as_deref().unwrap_or("null"), value)?;
                }
                out.end()
            }
        }
    }
}

/// One parsed GenBank entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.fields.get_mut(field)
    }

    /// Store a value under a field, returning the previous one
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Get the value stored under a field, inserting `default()` first when absent
    pub fn entry_or_insert_with(
        &mut self,
        field: &str,
        default: impl FnOnce() -> Value,
    ) -> &mut Value {
        self.fields.entry(field.to_string()).or_insert_with(default)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The record identifier: the text under `locus[null]`
    pub fn identifier(&self) -> Option<&str> {
        self.get(IDENTIFIER_FIELD)
            .and_then(|locus| locus.get(None))
            .and_then(Value::as_text)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, value) in &self.fields {
            out.serialize_entry(field, value)?;
        }
        out.end()
    }
}
