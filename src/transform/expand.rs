//! Key-path expander: rebuilds nested structure from dot-delimited keys.
//!
//! `name.firstName` becomes a `name` node holding a `firstName` leaf.
//! The expansion is total: any flat record produces a tree, and every
//! leaf path joined with `.` reproduces a key of the source record.
//!
//! Collision rule: when a prefix of one key was previously assigned as a
//! leaf (e.g. `a` set, then `a.b` seen), the leaf is overwritten by a
//! fresh node. Likewise a final segment overwrites whatever already sat
//! there. Later keys in record order win in both directions.

use crate::models::{FlatRecord, NestedRecord, NestedValue};

/// Expand one flat record into a nested tree.
pub fn expand_record(record: &FlatRecord) -> NestedRecord {
    let mut root = NestedRecord::new();
    for (key, value) in record.iter() {
        insert_path(&mut root, key, value);
    }
    root
}

/// Walk/create nodes for every segment except the last, then assign the
/// raw value at the last segment.
fn insert_path(node: &mut NestedRecord, path: &str, value: &str) {
    match path.split_once('.') {
        None => {
            node.insert(path.to_string(), NestedValue::leaf(value));
        }
        Some((head, rest)) => {
            let child = node
                .entry(head.to_string())
                .or_insert_with(NestedValue::empty_node);
            // Prior leaf at this prefix: replaced by a node, value lost.
            if child.as_node().is_none() {
                *child = NestedValue::empty_node();
            }
            if let NestedValue::Node(children) = child {
                insert_path(children, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(entries: &[(&str, &str)]) -> FlatRecord {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Join every leaf path with '.' back into flat keys.
    fn leaf_paths(node: &NestedRecord) -> Vec<String> {
        fn walk(prefix: &str, value: &NestedValue, out: &mut Vec<String>) {
            match value {
                NestedValue::Leaf(_) => out.push(prefix.to_string()),
                NestedValue::Node(children) => {
                    for (key, child) in children {
                        let path = format!("{}.{}", prefix, key);
                        walk(&path, child, out);
                    }
                }
            }
        }

        let mut out = Vec::new();
        for (key, child) in node {
            walk(key, child, &mut out);
        }
        out.sort();
        out
    }

    #[test]
    fn test_flat_keys_stay_flat() {
        let tree = expand_record(&record(&[("age", "36"), ("city", "London")]));

        assert_eq!(tree.get("age").and_then(|v| v.as_str()), Some("36"));
        assert_eq!(tree.get("city").and_then(|v| v.as_str()), Some("London"));
    }

    #[test]
    fn test_dotted_keys_build_nested_nodes() {
        let tree = expand_record(&record(&[
            ("name.firstName", "Ada"),
            ("name.lastName", "Lovelace"),
            ("address.city", "London"),
        ]));

        let name = tree.get("name").unwrap();
        assert_eq!(name.get("firstName").and_then(|v| v.as_str()), Some("Ada"));
        assert_eq!(
            name.get("lastName").and_then(|v| v.as_str()),
            Some("Lovelace")
        );
        assert_eq!(
            tree.get("address")
                .and_then(|v| v.get("city"))
                .and_then(|v| v.as_str()),
            Some("London")
        );
    }

    #[test]
    fn test_deep_path() {
        let tree = expand_record(&record(&[("a.b.c.d", "deep")]));

        let leaf = tree
            .get("a")
            .and_then(|v| v.get("b"))
            .and_then(|v| v.get("c"))
            .and_then(|v| v.get("d"));
        assert_eq!(leaf.and_then(|v| v.as_str()), Some("deep"));
    }

    #[test]
    fn test_round_trip_reproduces_key_set() {
        let input = record(&[
            ("name.firstName", "Ada"),
            ("name.lastName", "Lovelace"),
            ("age", "36"),
            ("address.city", "London"),
            ("address.zip", "N1"),
            ("hobby", "mathematics"),
        ]);
        let tree = expand_record(&input);

        let mut expected: Vec<String> = input.iter().map(|(k, _)| k.to_string()).collect();
        expected.sort();
        assert_eq!(leaf_paths(&tree), expected);
    }

    #[test]
    fn test_leaf_then_prefix_collision_later_key_wins() {
        // `a` assigned as a leaf, then `a.b` turns it into a node.
        let tree = expand_record(&record(&[("a", "flat"), ("a.b", "nested")]));

        let a = tree.get("a").unwrap();
        assert!(a.as_str().is_none());
        assert_eq!(a.get("b").and_then(|v| v.as_str()), Some("nested"));
    }

    #[test]
    fn test_prefix_then_leaf_collision_later_key_wins() {
        // `a.b` builds a node, then `a` flattens it back to a leaf.
        let tree = expand_record(&record(&[("a.b", "nested"), ("a", "flat")]));

        assert_eq!(tree.get("a").and_then(|v| v.as_str()), Some("flat"));
    }

    #[test]
    fn test_empty_record_expands_to_empty_tree() {
        let tree = expand_record(&FlatRecord::new());
        assert!(tree.is_empty());
    }
}
