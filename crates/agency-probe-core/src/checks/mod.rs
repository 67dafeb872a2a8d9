//! Endpoint checks.
//!
//! Each submodule exposes `run(&mut RunContext)`, which issues its requests
//! and records exactly one result per assertion. Check bodies return
//! `Result<Verdict>` so transport and decode failures short-circuit with `?`
//! and are recorded by [`RunContext::conclude`](crate::context::RunContext::conclude).

pub mod agency;
pub mod contact;
pub mod listing;
pub mod lookup;
pub mod payloads;
pub mod review;
pub mod root;

use serde_json::Value;

/// Keys from `keys` that `body` lacks. A non-object body lacks all of them.
pub(crate) fn missing_keys<'k>(body: &Value, keys: &[&'k str]) -> Vec<&'k str> {
    keys.iter()
        .copied()
        .filter(|k| body.get(*k).is_none())
        .collect()
}

pub(crate) fn has_keys(body: &Value, keys: &[&str]) -> bool {
    missing_keys(body, keys).is_empty()
}

/// Top-level keys of a body, for failure details.
pub(crate) fn key_list(body: &Value) -> String {
    match body.as_object() {
        Some(map) => format!("{:?}", map.keys().collect::<Vec<_>>()),
        None => body.to_string(),
    }
}

pub(crate) fn is_true(value: Option<&Value>) -> bool {
    value.and_then(Value::as_bool) == Some(true)
}

/// Normalize a JSON id: strings as-is, numbers in decimal.
pub fn normalize_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The normalized `id` of an agency object.
pub fn agency_id_of(agency: &Value) -> Option<String> {
    agency.get("id").and_then(normalize_id)
}

/// Fields of `submitted` whose value is not echoed unchanged in `returned`.
pub(crate) fn unechoed_fields(submitted: &Value, returned: &Value) -> Vec<String> {
    let Some(fields) = submitted.as_object() else {
        return Vec::new();
    };
    fields
        .iter()
        .filter(|(key, value)| returned.get(key.as_str()) != Some(*value))
        .map(|(key, _)| key.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_keys() {
        let body = json!({ "agencies": [], "total": 0 });
        assert_eq!(
            missing_keys(&body, &["agencies", "pagination"]),
            vec!["pagination"]
        );
        assert!(has_keys(&body, &["agencies"]));
    }

    #[test]
    fn test_missing_keys_non_object() {
        let body = json!([1, 2, 3]);
        assert_eq!(missing_keys(&body, &["agency"]), vec!["agency"]);
    }

    #[test]
    fn test_key_list_format() {
        let body = json!({ "error": "nope" });
        assert_eq!(key_list(&body), r#"["error"]"#);
    }

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id(&json!("a1b2")), Some("a1b2".to_string()));
        assert_eq!(normalize_id(&json!(42)), Some("42".to_string()));
        assert_eq!(normalize_id(&json!("")), None);
        assert_eq!(normalize_id(&json!(null)), None);
        assert_eq!(agency_id_of(&json!({ "name": "x" })), None);
    }

    #[test]
    fn test_is_true() {
        assert!(is_true(Some(&json!(true))));
        assert!(!is_true(Some(&json!("true"))));
        assert!(!is_true(None));
    }

    #[test]
    fn test_unechoed_fields() {
        let submitted = json!({ "description": "new", "recruiting": false });
        let echoed = json!({ "id": "a", "description": "new", "recruiting": false });
        assert!(unechoed_fields(&submitted, &echoed).is_empty());

        let stale = json!({ "id": "a", "description": "old", "recruiting": false });
        assert_eq!(unechoed_fields(&submitted, &stale), vec!["description"]);
    }
}
