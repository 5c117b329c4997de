//! Dotted-path access into loosely typed records.
//!
//! Paths such as `profileRef.name` or `members.0.label` are resolved by
//! splitting on `.` and descending one segment at a time. Resolution is
//! total: a missing key, an out-of-range index or a scalar in the middle of
//! the path yields `None` instead of an error.

use serde_json::Value;

/// Resolve a dotted path against a value.
///
/// An empty path resolves to the value itself. Numeric segments index into
/// arrays; every other segment is an object key.
pub fn resolve<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|idx| items.get(idx)),
        _ => None,
    })
}

/// Returns true for values a user would consider "nothing there".
///
/// Missing, `null`, the empty string and the empty array are blank. Zero and
/// `false` are not.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Render a value as display text.
///
/// Strings are returned without quotes, `null` becomes the empty string and
/// containers are rendered as compact JSON.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Render an optional value, mapping `None` to the empty string.
pub fn opt_to_text(value: Option<&Value>) -> String {
    value.map(to_text).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_nested_objects() {
        let record = json!({ "profileRef": { "name": "Admin" } });
        assert_eq!(resolve(&record, "profileRef.name"), Some(&json!("Admin")));
    }

    #[test]
    fn missing_intermediate_is_none() {
        let record = json!({ "profileRef": null, "count": 3 });
        assert_eq!(resolve(&record, "profileRef.name"), None);
        assert_eq!(resolve(&record, "count.value"), None);
        assert_eq!(resolve(&record, "nothing.at.all"), None);
    }

    #[test]
    fn numeric_segments_index_arrays() {
        let record = json!({ "items": [{ "id": "a" }, { "id": "b" }] });
        assert_eq!(resolve(&record, "items.1.id"), Some(&json!("b")));
        assert_eq!(resolve(&record, "items.9.id"), None);
        assert_eq!(resolve(&record, "items.x"), None);
    }

    #[test]
    fn empty_path_is_identity() {
        let record = json!("plain");
        assert_eq!(resolve(&record, ""), Some(&record));
    }

    #[test]
    fn blank_values() {
        assert!(is_blank(None));
        assert!(is_blank(Some(&Value::Null)));
        assert!(is_blank(Some(&json!(""))));
        assert!(is_blank(Some(&json!([]))));
        assert!(!is_blank(Some(&json!(0))));
        assert!(!is_blank(Some(&json!(false))));
        assert!(!is_blank(Some(&json!(" "))));
    }

    #[test]
    fn text_rendering() {
        assert_eq!(to_text(&json!("abc")), "abc");
        assert_eq!(to_text(&json!(9.89)), "9.89");
        assert_eq!(to_text(&json!(true)), "true");
        assert_eq!(to_text(&Value::Null), "");
        assert_eq!(to_text(&json!(["a", 1])), r#"["a",1]"#);
        assert_eq!(opt_to_text(None), "");
    }
}
