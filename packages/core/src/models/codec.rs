//! Attribute Codec
//!
//! Coercion rules from untyped inbound JSON values into the five canonical
//! attribute kinds. Every function here is total: there is no error path,
//! and malformed input degrades to a well-typed value (empty list, empty
//! map, zero, false) instead of failing.
//!
//! That permissiveness is contractual. The store trades strict validation
//! for it on purpose; callers wanting stricter rules must add their own
//! policy layer in front of the store rather than tightening these rules.

use serde_json::Value;

/// Coerce any JSON value to its textual representation.
///
/// Strings pass through unquoted; every other value uses its JSON
/// rendering (`3` -> "3", `true` -> "true", `null` -> "null").
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Coerce any JSON value to an integer.
///
/// Numbers truncate toward zero, booleans map to 0/1, numeric strings
/// parse, everything else coerces to 0. No range clamping.
pub fn coerce_number(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::Bool(b) => i64::from(*b),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Coerce any JSON value to a boolean via truthiness.
///
/// `false`, `0`, `""`, and `null` are false; non-empty strings, non-zero
/// numbers, arrays, and objects are true.
pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Coerce any JSON value to an ordered list of strings.
///
/// Arrays pass through with elements stringified; any other shape is an
/// empty list. Never fails.
pub fn coerce_string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(coerce_string).collect(),
        _ => Vec::new(),
    }
}

/// Coerce any JSON value to a string-keyed map of strings.
///
/// Objects pass through with values stringified; any other shape
/// (including null) is an empty map. Arbitrary keys are preserved - the
/// store does not restrict metadata to a fixed key set.
pub fn coerce_string_map(value: &Value) -> std::collections::BTreeMap<String, String> {
    match value {
        Value::Object(entries) => entries
            .iter()
            .map(|(k, v)| (k.clone(), coerce_string(v)))
            .collect(),
        _ => std::collections::BTreeMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_string_passes_strings_through() {
        assert_eq!(coerce_string(&json!("hello")), "hello");
        assert_eq!(coerce_string(&json!("")), "");
    }

    #[test]
    fn test_coerce_string_renders_non_strings() {
        assert_eq!(coerce_string(&json!(3)), "3");
        assert_eq!(coerce_string(&json!(true)), "true");
        assert_eq!(coerce_string(&json!(null)), "null");
        assert_eq!(coerce_string(&json!(["a"])), "[\"a\"]");
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&json!(5)), 5);
        assert_eq!(coerce_number(&json!(4.9)), 4);
        assert_eq!(coerce_number(&json!("2")), 2);
        assert_eq!(coerce_number(&json!(" 3 ")), 3);
        assert_eq!(coerce_number(&json!(true)), 1);
        assert_eq!(coerce_number(&json!("not a number")), 0);
        assert_eq!(coerce_number(&json!(null)), 0);
        assert_eq!(coerce_number(&json!({})), 0);
    }

    #[test]
    fn test_coerce_bool_truthiness() {
        assert!(coerce_bool(&json!(true)));
        assert!(coerce_bool(&json!(1)));
        assert!(coerce_bool(&json!("yes")));
        assert!(coerce_bool(&json!("false"))); // non-empty string is truthy
        assert!(coerce_bool(&json!([])));
        assert!(coerce_bool(&json!({})));

        assert!(!coerce_bool(&json!(false)));
        assert!(!coerce_bool(&json!(0)));
        assert!(!coerce_bool(&json!("")));
        assert!(!coerce_bool(&json!(null)));
    }

    #[test]
    fn test_coerce_string_list_preserves_order_and_duplicates() {
        assert_eq!(
            coerce_string_list(&json!(["b", "a", "b"])),
            vec!["b", "a", "b"]
        );
        assert_eq!(coerce_string_list(&json!([1, true])), vec!["1", "true"]);
    }

    #[test]
    fn test_coerce_string_list_never_fails() {
        assert!(coerce_string_list(&json!("not a list")).is_empty());
        assert!(coerce_string_list(&json!(null)).is_empty());
        assert!(coerce_string_list(&json!({"a": 1})).is_empty());
    }

    #[test]
    fn test_coerce_string_map_accepts_arbitrary_keys() {
        let map = coerce_string_map(&json!({
            "assignee": "Alice",
            "dueDate": "2026-09-01",
            "anything": 7
        }));
        assert_eq!(map.get("assignee").unwrap(), "Alice");
        assert_eq!(map.get("anything").unwrap(), "7");
    }

    #[test]
    fn test_coerce_string_map_never_fails() {
        assert!(coerce_string_map(&json!(null)).is_empty());
        assert!(coerce_string_map(&json!(["a"])).is_empty());
        assert!(coerce_string_map(&json!("x")).is_empty());
    }
}
