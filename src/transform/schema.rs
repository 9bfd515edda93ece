//! Schema mapper: nested records onto the fixed `users` row shape.
//!
//! Mapping is total by design (best-effort ingestion): malformed or
//! missing data degrades to documented defaults instead of erroring, so
//! bad rows never block an otherwise-successful import.
//!
//! - `name` - `name.firstName` + `" "` + `name.lastName`, trimmed;
//!   [`DEFAULT_NAME`] when that comes out empty.
//! - `age` - strict base-10 parse of the `age` leaf; `0` for anything
//!   that is not a non-negative integer.
//! - `address` - canonical JSON of the `address` sub-tree when it is a
//!   mapping with at least one field; absent otherwise.
//! - `additional_info` - canonical JSON of every top-level field not
//!   consumed above; absent when nothing remains.

use serde_json::{Map, Value};

use crate::models::{NestedRecord, NestedValue, TargetUser};

/// Substitute when the source row carries no usable name parts.
pub const DEFAULT_NAME: &str = "Unknown User";

/// Top-level fields consumed by the fixed columns. Everything else is
/// swept into `additional_info` by set difference.
const CONSUMED_FIELDS: [&str; 3] = ["name", "age", "address"];

/// Map one nested record onto the persisted row shape.
pub fn map_user(record: &NestedRecord) -> TargetUser {
    TargetUser {
        name: map_name(record.get("name")),
        age: map_age(record.get("age")),
        address: map_address(record.get("address")),
        additional_info: map_additional_info(record),
    }
}

fn map_name(name: Option<&NestedValue>) -> String {
    let part = |key: &str| {
        name.and_then(|n| n.get(key))
            .and_then(|v| v.as_str())
            .unwrap_or("")
    };

    let full = format!("{} {}", part("firstName"), part("lastName"))
        .trim()
        .to_string();

    if full.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        full
    }
}

/// Strict full-string base-10 parse; negative and unparseable values
/// both degrade to 0.
fn map_age(age: Option<&NestedValue>) -> i32 {
    age.and_then(|v| v.as_str())
        .and_then(|s| s.parse::<i32>().ok())
        .filter(|parsed| *parsed >= 0)
        .unwrap_or(0)
}

fn map_address(address: Option<&NestedValue>) -> Option<String> {
    address
        .and_then(|v| v.as_node())
        .filter(|children| !children.is_empty())
        .map(|children| {
            let mut map = Map::new();
            for (key, child) in children {
                map.insert(key.clone(), child.to_json());
            }
            Value::Object(map).to_string()
        })
}

fn map_additional_info(record: &NestedRecord) -> Option<String> {
    let mut remainder = Map::new();
    for (key, value) in record {
        if !CONSUMED_FIELDS.contains(&key.as_str()) {
            remainder.insert(key.clone(), value.to_json());
        }
    }

    if remainder.is_empty() {
        None
    } else {
        Some(Value::Object(remainder).to_string())
    }
}
