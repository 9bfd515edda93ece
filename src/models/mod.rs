//! Domain models for the userload import pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`FlatRecord`] - One CSV row as dot-path keys mapped to string values
//! - [`ParsedRow`] - A [`FlatRecord`] plus its raw source line and line number
//! - [`NestedValue`] - Tagged tree rebuilt from dot-delimited keys
//! - [`TargetUser`] - The persisted row shape (name, age, address, additional_info)
//! - [`ImportRecord`] / [`ImportBatch`] - What one transaction consumes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

// =============================================================================
// Flat Record
// =============================================================================

/// One input row as flat `dot.path` keys mapped to raw string values.
///
/// Keys are unique; assigning an existing key replaces its value.
/// Iteration preserves insertion order, which is what makes the
/// expander's later-key-wins collision rule deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRecord {
    entries: Vec<(String, String)>,
}

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for FlatRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut record = FlatRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

// =============================================================================
// Parsed Row
// =============================================================================

/// A parsed data row together with its provenance.
///
/// The raw line and 1-based line number travel with the record so the
/// loader can report exactly which source line failed to insert.
#[derive(Debug, Clone)]
pub struct ParsedRow {
    /// 1-based line number in the source file (header is line 1).
    pub line_number: usize,
    /// The raw, untrimmed source line.
    pub raw: String,
    /// Header-to-value mapping for this row.
    pub fields: FlatRecord,
}

// =============================================================================
// Nested Value
// =============================================================================

/// A tagged tree rebuilt from dot-delimited flat keys.
///
/// Internal nodes map path segments to children; leaves hold the raw
/// string values. The mapper only ever reads this through the typed
/// accessors, so "is this a sub-tree or a plain value" is always an
/// explicit question rather than a runtime surprise.
#[derive(Debug, Clone, PartialEq)]
pub enum NestedValue {
    /// A raw string value from the source row.
    Leaf(String),
    /// A mapping from path segment to child value.
    Node(BTreeMap<String, NestedValue>),
}

/// The root of an expanded record. Always a mapping, never a leaf.
pub type NestedRecord = BTreeMap<String, NestedValue>;

impl NestedValue {
    pub fn leaf(value: impl Into<String>) -> Self {
        NestedValue::Leaf(value.into())
    }

    pub fn empty_node() -> Self {
        NestedValue::Node(BTreeMap::new())
    }

    /// The raw string if this is a leaf.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NestedValue::Leaf(s) => Some(s),
            NestedValue::Node(_) => None,
        }
    }

    /// The children map if this is a node.
    pub fn as_node(&self) -> Option<&BTreeMap<String, NestedValue>> {
        match self {
            NestedValue::Leaf(_) => None,
            NestedValue::Node(children) => Some(children),
        }
    }

    /// Child lookup; `None` for leaves and missing keys.
    pub fn get(&self, key: &str) -> Option<&NestedValue> {
        self.as_node().and_then(|children| children.get(key))
    }

    /// Convert to a `serde_json::Value`. Leaves become JSON strings.
    ///
    /// Keys come out in sorted order (the tree is a `BTreeMap`), which is
    /// what makes the serialized `address`/`additional_info` columns
    /// deterministic for identical input.
    pub fn to_json(&self) -> Value {
        match self {
            NestedValue::Leaf(s) => Value::String(s.clone()),
            NestedValue::Node(children) => {
                let mut map = Map::new();
                for (key, child) in children {
                    map.insert(key.clone(), child.to_json());
                }
                Value::Object(map)
            }
        }
    }
}

// =============================================================================
// Target User (persisted shape)
// =============================================================================

/// The exact shape written to the `users` table.
///
/// All defaulting has already happened by the time one of these exists:
/// `name` is never empty, `age` is never negative, and the two optional
/// columns are `None` rather than empty JSON objects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetUser {
    /// Full display name; `"Unknown User"` when the source had none.
    pub name: String,
    /// Non-negative age; `0` when the source value was absent or invalid.
    pub age: i32,
    /// Canonical JSON of the `address` sub-tree, absent when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Canonical JSON of every unconsumed top-level field, absent when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

// =============================================================================
// Import Batch
// =============================================================================

/// One mapped record queued for insertion, with provenance for diagnostics.
#[derive(Debug, Clone)]
pub struct ImportRecord {
    pub user: TargetUser,
    /// The raw source line this record was mapped from.
    pub raw_line: String,
    /// 1-based line number in the source file.
    pub line_number: usize,
}

/// The ordered set of records one import request produces.
///
/// Created fresh per request, consumed entirely by one transaction,
/// discarded afterwards.
pub type ImportBatch = Vec<ImportRecord>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_record_insert_replaces() {
        let mut record = FlatRecord::new();
        record.insert("name", "Alice");
        record.insert("name", "Bob");

        assert_eq!(record.len(), 1);
        assert_eq!(record.get("name"), Some("Bob"));
    }

    #[test]
    fn test_flat_record_preserves_insertion_order() {
        let mut record = FlatRecord::new();
        record.insert("b", "2");
        record.insert("a", "1");
        record.insert("c", "3");

        let keys: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_nested_value_accessors() {
        let mut children = BTreeMap::new();
        children.insert("firstName".to_string(), NestedValue::leaf("Ada"));
        let node = NestedValue::Node(children);

        assert!(node.as_str().is_none());
        assert_eq!(node.get("firstName").and_then(|v| v.as_str()), Some("Ada"));
        assert!(node.get("lastName").is_none());

        let leaf = NestedValue::leaf("42");
        assert_eq!(leaf.as_str(), Some("42"));
        assert!(leaf.get("anything").is_none());
    }

    #[test]
    fn test_to_json_sorts_keys() {
        let mut children = BTreeMap::new();
        children.insert("zip".to_string(), NestedValue::leaf("75001"));
        children.insert("city".to_string(), NestedValue::leaf("Paris"));
        let node = NestedValue::Node(children);

        let json = serde_json::to_string(&node.to_json()).unwrap();
        assert_eq!(json, r#"{"city":"Paris","zip":"75001"}"#);
    }

    #[test]
    fn test_target_user_serialization_skips_absent_columns() {
        let user = TargetUser {
            name: "Ada Lovelace".into(),
            age: 36,
            address: None,
            additional_info: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("address"));
        assert!(!json.contains("additional_info"));
    }
}
