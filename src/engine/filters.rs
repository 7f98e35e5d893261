//! Exact-match condition filtering for `select`
//!
//! No ranges, no patterns, no OR. A record matches when every condition
//! field is present and strictly equal (type and value) to the expected value.

use serde_json::{Map, Value};

use crate::catalog::Record;

/// Field name to the exact value it must hold
pub type Conditions = Map<String, Value>;

/// Evaluates conditions against records
pub struct ConditionFilter;

impl ConditionFilter {
    /// Checks if a record matches all conditions (AND semantics).
    /// Empty conditions match every record.
    pub fn matches(record: &Record, conditions: &Conditions) -> bool {
        conditions
            .iter()
            .all(|(field, expected)| Self::eq_match(record.get(field), expected))
    }

    /// Exact equality, no coercion; a missing field never matches
    fn eq_match(actual: Option<&Value>, expected: &Value) -> bool {
        matches!(actual, Some(value) if value == expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_equality_match() {
        let record = obj(json!({"id": 1, "name": "Alice", "age": 30}));

        assert!(ConditionFilter::matches(&record, &obj(json!({"name": "Alice"}))));
        assert!(!ConditionFilter::matches(&record, &obj(json!({"name": "Bob"}))));
    }

    #[test]
    fn test_no_type_coercion() {
        let record = obj(json!({"id": 1, "value": 123}));

        assert!(!ConditionFilter::matches(&record, &obj(json!({"value": "123"}))));
        assert!(ConditionFilter::matches(&record, &obj(json!({"value": 123}))));
    }

    #[test]
    fn test_multiple_conditions_and() {
        let record = obj(json!({"id": 1, "age": 25, "active": true}));

        assert!(ConditionFilter::matches(
            &record,
            &obj(json!({"age": 25, "active": true}))
        ));
        assert!(!ConditionFilter::matches(
            &record,
            &obj(json!({"age": 25, "active": false}))
        ));
    }

    #[test]
    fn test_missing_field_no_match() {
        let record = obj(json!({"id": 1, "name": "Alice"}));

        assert!(!ConditionFilter::matches(&record, &obj(json!({"age": 30}))));
        assert!(!ConditionFilter::matches(&record, &obj(json!({"age": null}))));
    }

    #[test]
    fn test_empty_conditions_match_everything() {
        let record = obj(json!({"id": 1}));
        assert!(ConditionFilter::matches(&record, &Conditions::new()));
    }

    #[test]
    fn test_nested_values_compare_structurally() {
        let record = obj(json!({"id": 1, "tags": ["a", "b"]}));

        assert!(ConditionFilter::matches(&record, &obj(json!({"tags": ["a", "b"]}))));
        assert!(!ConditionFilter::matches(&record, &obj(json!({"tags": ["b", "a"]}))));
    }
}
