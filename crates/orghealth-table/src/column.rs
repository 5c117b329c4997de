//! Declarative table and column definitions.
//!
//! A [`TableDefinition`] is authored once per entity type (users, fields,
//! classes, ...) and describes, column by column, where the cell data lives
//! on a record and how it should be decorated. Definitions deserialize from
//! JSON:
//!
//! ```json
//! { "columns": [
//!     { "label": "#", "type": "index" },
//!     { "label": "Score", "type": "score", "data": { "value": "score", "id": "id", "name": "name" } },
//!     { "label": "Used (%)", "type": "percentage", "data": { "value": "usedPercentage" } },
//!     { "label": "Profiles", "type": "links",
//!       "data": { "values": "profileRefs", "value": "url", "label": "name" } }
//! ] }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use orghealth_model::{BoxError, path};

use crate::modifier::Modifier;

/// Column type tag. Each tag produces exactly one kind of cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Index,
    Score,
    Text,
    Texts,
    Numeric,
    Percentage,
    Link,
    Links,
    Boolean,
    DateTime,
    Dependencies,
    Objects,
}

impl ColumnKind {
    pub const fn all() -> &'static [Self] {
        &[
            Self::Index,
            Self::Score,
            Self::Text,
            Self::Texts,
            Self::Numeric,
            Self::Percentage,
            Self::Link,
            Self::Links,
            Self::Boolean,
            Self::DateTime,
            Self::Dependencies,
            Self::Objects,
        ]
    }

    /// Multi-valued kinds read a repeating structure through `values`.
    pub const fn is_multi(self) -> bool {
        matches!(self, Self::Texts | Self::Links | Self::Objects)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Score => "score",
            Self::Text => "text",
            Self::Texts => "texts",
            Self::Numeric => "numeric",
            Self::Percentage => "percentage",
            Self::Link => "link",
            Self::Links => "links",
            Self::Boolean => "boolean",
            Self::DateTime => "datetime",
            Self::Dependencies => "dependencies",
            Self::Objects => "objects",
        }
    }

    /// Name of the field a cell of this kind displays.
    pub const fn primary_field(self) -> &'static str {
        match self {
            Self::Link | Self::Links => "label",
            _ => "value",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layout hint for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

type TemplateFn = Arc<dyn Fn(&Value) -> Result<String, BoxError> + Send + Sync>;

/// Renders one item of an object-list column as display text.
///
/// Built either from a closure or from a pattern such as `"{name} ({type})"`
/// where each placeholder is a dotted path into the item. A placeholder that
/// does not resolve makes rendering fail.
#[derive(Clone)]
pub struct ItemTemplate {
    pattern: Option<String>,
    render: TemplateFn,
}

impl ItemTemplate {
    pub fn new<F>(render: F) -> Self
    where
        F: Fn(&Value) -> Result<String, BoxError> + Send + Sync + 'static,
    {
        Self {
            pattern: None,
            render: Arc::new(render),
        }
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let source = pattern.clone();
        Self {
            pattern: Some(pattern),
            render: Arc::new(move |item: &Value| render_pattern(&source, item)),
        }
    }

    pub fn render(&self, item: &Value) -> Result<String, BoxError> {
        (self.render)(item)
    }

    /// The pattern text, when the template was built from one.
    pub fn source(&self) -> Option<&str> {
        self.pattern.as_deref()
    }
}

impl fmt::Debug for ItemTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pattern {
            Some(pattern) => f.debug_tuple("ItemTemplate").field(pattern).finish(),
            None => f.write_str("ItemTemplate(<fn>)"),
        }
    }
}

impl<'de> Deserialize<'de> for ItemTemplate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::pattern)
    }
}

fn render_pattern(pattern: &str, item: &Value) -> Result<String, BoxError> {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after
            .find('}')
            .ok_or_else(|| format!("unclosed placeholder in template '{pattern}'"))?;
        let placeholder = after[..end].trim();
        let value = path::resolve(item, placeholder)
            .ok_or_else(|| format!("template placeholder '{placeholder}' has no value"))?;
        out.push_str(&path::to_text(value));
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Where a column finds its data on a record.
///
/// `fields` maps cell field names (`value`, `label`, `id`, `name`, ...) to
/// dotted paths. Multi-valued columns also name the array in `values`; their
/// field paths are then resolved against each array item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataLocator {
    #[serde(default)]
    pub values: Option<String>,
    #[serde(default)]
    pub template: Option<ItemTemplate>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl DataLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locator with a single `value` field.
    pub fn value(path: impl Into<String>) -> Self {
        Self::new().with_field("value", path)
    }

    /// Locator for a repeating structure.
    pub fn values(path: impl Into<String>) -> Self {
        Self {
            values: Some(path.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.fields.insert(name.into(), path.into());
        self
    }

    #[must_use]
    pub fn with_template(mut self, template: ItemTemplate) -> Self {
        self.template = Some(template);
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// One column of a table.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDefinition {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ColumnKind,
    #[serde(default)]
    pub data: DataLocator,
    #[serde(default)]
    pub modifier: Option<Modifier>,
    #[serde(default)]
    pub orientation: Option<Orientation>,
}

impl ColumnDefinition {
    pub fn new(label: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            label: label.into(),
            kind,
            data: DataLocator::default(),
            modifier: None,
            orientation: None,
        }
    }

    pub fn index(label: impl Into<String>) -> Self {
        Self::new(label, ColumnKind::Index)
    }

    /// Score column reading the record's score, id and name.
    pub fn score(label: impl Into<String>) -> Self {
        Self::new(label, ColumnKind::Score).with_data(
            DataLocator::value("score")
                .with_field("id", "id")
                .with_field("name", "name"),
        )
    }

    /// Scalar column reading a single `value` path.
    pub fn scalar(label: impl Into<String>, kind: ColumnKind, path: impl Into<String>) -> Self {
        Self::new(label, kind).with_data(DataLocator::value(path))
    }

    pub fn link(
        label: impl Into<String>,
        url_path: impl Into<String>,
        label_path: impl Into<String>,
    ) -> Self {
        Self::new(label, ColumnKind::Link)
            .with_data(DataLocator::value(url_path).with_field("label", label_path))
    }

    pub fn links(
        label: impl Into<String>,
        values: impl Into<String>,
        url_path: impl Into<String>,
        label_path: impl Into<String>,
    ) -> Self {
        Self::new(label, ColumnKind::Links).with_data(
            DataLocator::values(values)
                .with_field("value", url_path)
                .with_field("label", label_path),
        )
    }

    pub fn texts(label: impl Into<String>, values: impl Into<String>) -> Self {
        Self::new(label, ColumnKind::Texts).with_data(DataLocator::values(values))
    }

    pub fn objects(
        label: impl Into<String>,
        values: impl Into<String>,
        template: ItemTemplate,
    ) -> Self {
        Self::new(label, ColumnKind::Objects)
            .with_data(DataLocator::values(values).with_template(template))
    }

    pub fn dependencies(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(label, ColumnKind::Dependencies).with_data(
            DataLocator::value(path)
                .with_field("id", "id")
                .with_field("name", "name"),
        )
    }

    #[must_use]
    pub fn with_data(mut self, data: DataLocator) -> Self {
        self.data = data;
        self
    }

    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = Some(modifier);
        self
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Every record path this column reads. For multi-valued columns only the
    /// `values` path is a record path.
    pub fn paths(&self) -> Vec<&str> {
        if self.kind.is_multi()
            && let Some(values) = &self.data.values
        {
            return vec![values.as_str()];
        }
        self.data.fields.values().map(String::as_str).collect()
    }
}

/// Ordered set of columns describing one table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableDefinition {
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    pub fn new(columns: Vec<ColumnDefinition>) -> Self {
        Self { columns }
    }

    pub fn column(&self, index: usize) -> Option<&ColumnDefinition> {
        self.columns.get(index)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
