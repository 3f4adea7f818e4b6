//! Schema traversal
//!
//! Discovers the set of field paths reachable in document-shaped records.
//! The walk is an explicit worklist with a depth bound: documents are trees,
//! but a pathological or adversarial input must terminate with a reported
//! truncation rather than recurse without limit. Arrays contribute one
//! representative element under an index-free placeholder segment; tabular
//! rows are just the trivial one-level case.

use crate::domain::{FieldPath, PathSegment};
use serde_json::Value;
use std::collections::BTreeSet;

/// Default bound on nesting depth below the collection root
pub const MAX_TRAVERSAL_DEPTH: usize = 32;

/// Result of walking one record shape
#[derive(Debug, Clone, Default)]
pub struct TraversalOutcome {
    /// Discovered leaf field paths, deduplicated and ordered
    pub paths: Vec<FieldPath>,
    /// Whether any branch was cut short by the depth bound
    pub truncated: bool,
}

impl TraversalOutcome {
    /// Merge another outcome into this one, keeping paths deduplicated
    pub fn merge(&mut self, other: TraversalOutcome) {
        if other.paths.is_empty() && !other.truncated {
            return;
        }
        let mut set: BTreeSet<FieldPath> = self.paths.drain(..).collect();
        set.extend(other.paths);
        self.paths = set.into_iter().collect();
        self.truncated |= other.truncated;
    }
}

/// Discover every leaf field path in a sample record
pub fn discover_fields(collection: &str, record: &Value, max_depth: usize) -> TraversalOutcome {
    let mut paths = BTreeSet::new();
    let mut truncated = false;
    let mut worklist: Vec<(FieldPath, &Value)> = vec![(FieldPath::new(collection), record)];

    while let Some((path, value)) = worklist.pop() {
        match value {
            Value::Object(map) => {
                if path.depth() >= max_depth {
                    truncated = true;
                    continue;
                }
                for (key, child) in map {
                    worklist.push((path.child_key(key), child));
                }
            }
            Value::Array(elements) => {
                if path.depth() >= max_depth {
                    truncated = true;
                    continue;
                }
                // One representative element; array paths are homogeneous.
                if let Some(first) = elements.first() {
                    worklist.push((path.child_array(), first));
                }
            }
            _ => {
                // Scalar leaf, including null: the path exists even when this
                // particular record carries no value.
                if path.depth() > 0 {
                    paths.insert(path);
                }
            }
        }
    }

    if truncated {
        tracing::warn!(
            collection,
            max_depth,
            "Traversal depth bound reached; deeper fields were not enumerated"
        );
    }

    TraversalOutcome {
        paths: paths.into_iter().collect(),
        truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path_strings(outcome: &TraversalOutcome) -> Vec<String> {
        outcome.paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_flat_record() {
        let record = json!({"name": "João Silva", "age": 44, "active": true});
        let outcome = discover_fields("users", &record, MAX_TRAVERSAL_DEPTH);
        assert_eq!(
            path_strings(&outcome),
            vec!["users.active", "users.age", "users.name"]
        );
        assert!(!outcome.truncated);
    }

    #[test]
    fn test_nested_and_array_fields() {
        let record = json!({
            "reviewer": {"name": "Maria Santos"},
            "team": [{"member_name": "João Silva"}, {"member_name": "Pedro Costa"}],
            "tags": ["a", "b"]
        });
        let outcome = discover_fields("reviews", &record, MAX_TRAVERSAL_DEPTH);
        assert_eq!(
            path_strings(&outcome),
            vec![
                "reviews.reviewer.name",
                "reviews.tags[]",
                "reviews.team[].member_name"
            ]
        );
    }

    #[test]
    fn test_null_leaf_still_yields_path() {
        let record = json!({"email": null});
        let outcome = discover_fields("users", &record, MAX_TRAVERSAL_DEPTH);
        assert_eq!(path_strings(&outcome), vec!["users.email"]);
    }

    #[test]
    fn test_depth_bound_reports_truncation() {
        let mut record = json!("leaf");
        for _ in 0..10 {
            record = json!({ "level": record });
        }
        let outcome = discover_fields("deep", &record, 3);
        assert!(outcome.truncated);
        assert!(outcome.paths.iter().all(|p| p.depth() <= 3));
    }

    #[test]
    fn test_merge_deduplicates_across_records() {
        let a = discover_fields("users", &json!({"name": "A B"}), MAX_TRAVERSAL_DEPTH);
        let b = discover_fields(
            "users",
            &json!({"name": "C D", "email": "a@x.com"}),
            MAX_TRAVERSAL_DEPTH,
        );
        let mut merged = a;
        merged.merge(b);
        assert_eq!(path_strings(&merged), vec!["users.email", "users.name"]);
    }

    #[test]
    fn test_empty_array_contributes_no_path() {
        let record = json!({"tags": []});
        let outcome = discover_fields("docs", &record, MAX_TRAVERSAL_DEPTH);
        assert!(outcome.paths.is_empty());
    }
}
