//! Read-only view over a dependency summary value.
//!
//! The dataset layer attaches `{ "using": [...], "referenced": [...] }` to
//! records whose dependencies were computed. Items are usually objects with
//! `name` and `type`.

use serde_json::Value;

use orghealth_model::path;

#[derive(Debug, Clone, Copy)]
pub struct DependencySummary<'a> {
    using: &'a [Value],
    referenced: &'a [Value],
}

impl<'a> DependencySummary<'a> {
    /// View a resolved value. Anything that is not an object is no summary;
    /// missing lists are empty.
    pub fn from_value(value: Option<&'a Value>) -> Option<Self> {
        let object = value?.as_object()?;
        let list = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default()
        };
        Some(Self {
            using: list("using"),
            referenced: list("referenced"),
        })
    }

    pub fn using(&self) -> &'a [Value] {
        self.using
    }

    pub fn referenced(&self) -> &'a [Value] {
        self.referenced
    }

    /// Total number of items on both sides.
    pub fn count(&self) -> usize {
        self.using.len() + self.referenced.len()
    }

    pub fn using_labels(&self) -> Vec<String> {
        self.using.iter().map(item_label).collect()
    }

    pub fn referenced_labels(&self) -> Vec<String> {
        self.referenced.iter().map(item_label).collect()
    }

    /// Text of every item, used by the search filter.
    pub fn labels(&self) -> impl Iterator<Item = String> + '_ {
        self.using
            .iter()
            .chain(self.referenced.iter())
            .map(item_label)
    }
}

/// `"<name> (<type>)"`, `"<name>"`, or the item's own text.
pub fn item_label(item: &Value) -> String {
    let name = item.get("name").filter(|v| !v.is_null());
    let kind = item.get("type").filter(|v| !v.is_null());
    match (name, kind) {
        (Some(name), Some(kind)) => format!("{} ({})", path::to_text(name), path::to_text(kind)),
        (Some(name), None) => path::to_text(name),
        _ => path::to_text(item),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn labels_from_items() {
        let value = json!({
            "using": [{ "name": "Account", "type": "CustomObject" }, { "name": "Helper" }],
            "referenced": ["raw"],
        });
        let summary = DependencySummary::from_value(Some(&value)).unwrap();
        assert_eq!(summary.count(), 3);
        assert_eq!(
            summary.using_labels(),
            ["Account (CustomObject)", "Helper"]
        );
        assert_eq!(summary.referenced_labels(), ["raw"]);
    }

    #[test]
    fn non_objects_are_not_summaries() {
        assert!(DependencySummary::from_value(None).is_none());
        assert!(DependencySummary::from_value(Some(&json!([1, 2]))).is_none());
        let empty = json!({});
        let summary = DependencySummary::from_value(Some(&empty)).unwrap();
        assert_eq!(summary.count(), 0);
    }
}
