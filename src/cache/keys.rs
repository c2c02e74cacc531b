//! Key-Space Builder
//!
//! Deterministic cache keys for the operator directory and the invalidation
//! patterns that address them.
//!
//! | Namespace | Key |
//! |-----------|-----|
//! | entity    | `operator:{id}` |
//! | listing   | `operators:list:{page}:{limit}:{filter json}` |
//! | activity  | `operator:{id}:activities:{page}:{limit}` |

use std::collections::BTreeMap;
use std::fmt::Display;

use serde_json::Value;

const ENTITY_PREFIX: &str = "operator:";
const LISTING_PREFIX: &str = "operators:list:";

/// Matches every listing key.
pub const LIST_KEYS_PATTERN: &str = "^operators:list:";

// == Key Builders ==
/// Key for a single operator record.
#[must_use]
pub fn operator_key(operator_id: impl Display) -> String {
    format!("{}{}", ENTITY_PREFIX, operator_id)
}

/// Key for one page of a filtered operator listing.
///
/// Equivalent filters map to the same key regardless of field order. A
/// missing filter, `null`, and `{}` are the same empty filter; fields whose
/// value is `null` are dropped.
#[must_use]
pub fn operators_list_key(page: u32, limit: u32, filters: Option<&Value>) -> String {
    format!(
        "{}{}:{}:{}",
        LISTING_PREFIX,
        page,
        limit,
        canonical_filter_json(filters)
    )
}

/// Key for one page of an operator's activity feed.
#[must_use]
pub fn operator_activities_key(operator_id: impl Display, page: u32, limit: u32) -> String {
    format!("{}{}:activities:{}:{}", ENTITY_PREFIX, operator_id, page, limit)
}

// == Patterns ==
/// Pattern matching every cached artifact scoped under an operator
/// (`operator:{id}:...`), excluding the entity key itself.
#[must_use]
pub fn operator_artifacts_pattern(operator_id: impl Display) -> String {
    format!(
        "^{}:",
        regex::escape(&operator_key(operator_id))
    )
}

/// Returns true for single-operator keys (`operator:{id}` with no suffix).
pub fn is_entity_key(key: &str) -> bool {
    key.strip_prefix(ENTITY_PREFIX)
        .is_some_and(|id| !id.is_empty() && !id.contains(':'))
}

// == Filter Canonicalization ==
/// Serializes a filter with object keys sorted at every depth.
fn canonical_filter_json(filters: Option<&Value>) -> String {
    let canonical = match filters {
        None | Some(Value::Null) => Value::Object(Default::default()),
        Some(value) => canonicalize(value),
    };
    // Serializing a `Value` cannot fail.
    serde_json::to_string(&canonical).unwrap_or_else(|_| "{}".to_string())
}

/// Normalizes a listing filter the way the key builder reads it: null fields
/// dropped and object keys sorted. `None`, `null` and `{}` all become `None`.
pub fn normalize_filter(filter: Option<Value>) -> Option<Value> {
    match filter.as_ref().map(canonicalize) {
        None | Some(Value::Null) => None,
        Some(Value::Object(fields)) if fields.is_empty() => None,
        other => other,
    }
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, Value> = map
                .iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, canonicalize(v)))
                .collect();
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), v))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use serde_json::json;

    #[test]
    fn test_operator_key() {
        assert_eq!(operator_key(42), "operator:42");
        assert_eq!(operator_key("op-7"), "operator:op-7");
    }

    #[test]
    fn test_activities_key() {
        assert_eq!(operator_activities_key(42, 1, 20), "operator:42:activities:1:20");
    }

    #[test]
    fn test_list_key_empty_filters() {
        let expected = "operators:list:1:20:{}";
        assert_eq!(operators_list_key(1, 20, None), expected);
        assert_eq!(operators_list_key(1, 20, Some(&Value::Null)), expected);
        assert_eq!(operators_list_key(1, 20, Some(&json!({}))), expected);
        assert_eq!(operators_list_key(1, 20, Some(&json!({"role": null}))), expected);
    }

    #[test]
    fn test_list_key_order_independent() {
        let a: Value = serde_json::from_str(r#"{"status":"active","role":"clerk"}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"role":"clerk","status":"active"}"#).unwrap();
        assert_eq!(operators_list_key(2, 10, Some(&a)), operators_list_key(2, 10, Some(&b)));
        assert_eq!(
            operators_list_key(2, 10, Some(&a)),
            r#"operators:list:2:10:{"role":"clerk","status":"active"}"#
        );
    }

    #[test]
    fn test_list_key_nested_objects_sorted() {
        let a = json!({"range": {"to": 5, "from": 1}});
        let b = json!({"range": {"from": 1, "to": 5}});
        assert_eq!(operators_list_key(1, 20, Some(&a)), operators_list_key(1, 20, Some(&b)));
    }

    #[test]
    fn test_list_key_distinguishes_queries() {
        let active = json!({"status": "active"});
        let inactive = json!({"status": "inactive"});
        assert_ne!(
            operators_list_key(1, 20, Some(&active)),
            operators_list_key(1, 20, Some(&inactive))
        );
        assert_ne!(operators_list_key(1, 20, None), operators_list_key(2, 20, None));
        assert_ne!(operators_list_key(1, 20, None), operators_list_key(1, 50, None));
    }

    #[test]
    fn test_entity_key_detection() {
        assert!(is_entity_key("operator:42"));
        assert!(!is_entity_key("operator:"));
        assert!(!is_entity_key("operator:42:activities:1:20"));
        assert!(!is_entity_key("operators:list:1:20:{}"));
    }

    #[test]
    fn test_normalize_filter() {
        assert_eq!(normalize_filter(None), None);
        assert_eq!(normalize_filter(Some(json!({"branch_id": null}))), None);
        assert_eq!(
            normalize_filter(Some(json!({"status": "active", "role": null}))),
            Some(json!({"status": "active"}))
        );
        assert_eq!(normalize_filter(Some(json!(["status"]))), Some(json!(["status"])));
    }

    #[test]
    fn test_patterns() {
        let list = Regex::new(LIST_KEYS_PATTERN).unwrap();
        assert!(list.is_match(&operators_list_key(1, 20, None)));
        assert!(!list.is_match(&operator_key(1)));

        let artifacts = Regex::new(&operator_artifacts_pattern(4)).unwrap();
        assert!(artifacts.is_match(&operator_activities_key(4, 1, 20)));
        assert!(!artifacts.is_match(&operator_activities_key(42, 1, 20)));
        assert!(!artifacts.is_match(&operator_key(4)));
    }
}
