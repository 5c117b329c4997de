//! Typed cells and the factory that builds them from records.

use std::collections::BTreeMap;

use serde_json::Value;

use orghealth_model::{Record, path};

use crate::column::{ColumnDefinition, ColumnKind};
use crate::error::{Result, TableError};

/// Resolved fields of a scalar cell, keyed by field name (`value`, `label`,
/// `id`, ...). Paths that did not resolve are absent.
pub type Fields = BTreeMap<String, Value>;

/// Cell payload. The variant is the cell's type and always matches the kind
/// of the column that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum CellData {
    Index,
    Score(Fields),
    Text(Fields),
    Texts(Vec<Cell>),
    Numeric(Fields),
    Percentage(Fields),
    Link(Fields),
    Links(Vec<Cell>),
    Boolean(Fields),
    DateTime(Fields),
    Dependencies(Fields),
    Objects(Vec<Cell>),
}

impl CellData {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Index => ColumnKind::Index,
            Self::Score(_) => ColumnKind::Score,
            Self::Text(_) => ColumnKind::Text,
            Self::Texts(_) => ColumnKind::Texts,
            Self::Numeric(_) => ColumnKind::Numeric,
            Self::Percentage(_) => ColumnKind::Percentage,
            Self::Link(_) => ColumnKind::Link,
            Self::Links(_) => ColumnKind::Links,
            Self::Boolean(_) => ColumnKind::Boolean,
            Self::DateTime(_) => ColumnKind::DateTime,
            Self::Dependencies(_) => ColumnKind::Dependencies,
            Self::Objects(_) => ColumnKind::Objects,
        }
    }

    fn scalar(kind: ColumnKind, fields: Fields) -> Self {
        match kind {
            ColumnKind::Score => Self::Score(fields),
            ColumnKind::Numeric => Self::Numeric(fields),
            ColumnKind::Percentage => Self::Percentage(fields),
            ColumnKind::Link => Self::Link(fields),
            ColumnKind::Boolean => Self::Boolean(fields),
            ColumnKind::DateTime => Self::DateTime(fields),
            ColumnKind::Dependencies => Self::Dependencies(fields),
            _ => Self::Text(fields),
        }
    }

    fn multi(kind: ColumnKind, items: Vec<Cell>) -> Self {
        match kind {
            ColumnKind::Links => Self::Links(items),
            ColumnKind::Objects => Self::Objects(items),
            _ => Self::Texts(items),
        }
    }
}

/// One resolved, decorated value of a row.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub data: CellData,
    /// Text to show instead of the raw value.
    pub decoration: Option<String>,
    /// Render as monospace/code.
    pub preformatted: bool,
    /// Presentation hint attached by row-building callbacks.
    pub hint: Option<String>,
}

impl Cell {
    pub fn new(data: CellData) -> Self {
        Self {
            data,
            decoration: None,
            preformatted: false,
            hint: None,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    /// Resolved scalar fields, `None` for index and multi-valued cells.
    pub fn fields(&self) -> Option<&Fields> {
        match &self.data {
            CellData::Score(fields)
            | CellData::Text(fields)
            | CellData::Numeric(fields)
            | CellData::Percentage(fields)
            | CellData::Link(fields)
            | CellData::Boolean(fields)
            | CellData::DateTime(fields)
            | CellData::Dependencies(fields) => Some(fields),
            CellData::Index | CellData::Texts(_) | CellData::Links(_) | CellData::Objects(_) => {
                None
            }
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields()?.get(name)
    }

    /// The `value` field.
    pub fn value(&self) -> Option<&Value> {
        self.field("value")
    }

    /// The `label` field.
    pub fn label(&self) -> Option<&Value> {
        self.field("label")
    }

    /// Items of a multi-valued cell, empty otherwise.
    pub fn items(&self) -> &[Cell] {
        match &self.data {
            CellData::Texts(items) | CellData::Links(items) | CellData::Objects(items) => items,
            _ => &[],
        }
    }

    /// Text a renderer shows: the decoration, else the primary field.
    pub fn display_text(&self) -> String {
        if let Some(decoration) = &self.decoration {
            return decoration.clone();
        }
        path::opt_to_text(self.field(self.kind().primary_field()))
    }
}

/// Builds cells from a column definition and a record.
pub struct CellFactory;

impl CellFactory {
    /// Build the cell of `column` for `record`.
    ///
    /// `row` is the record's position and is only used to give template
    /// failures enough context to be reported.
    pub fn create(column: &ColumnDefinition, record: &Record, row: usize) -> Result<Cell> {
        if column.kind == ColumnKind::Index {
            return Ok(Cell::new(CellData::Index));
        }
        if column.kind.is_multi() {
            return Self::create_multi(column, record, row);
        }
        let mut fields = resolve_fields(column, record.value());
        if column.kind == ColumnKind::Score
            && let Some(card) = record.score_card()
        {
            fields.insert("value".to_string(), Value::from(card.score()));
        }
        let mut cell = Cell::new(CellData::scalar(column.kind, fields));
        decorate(&mut cell, column);
        Ok(cell)
    }

    fn create_multi(column: &ColumnDefinition, record: &Record, row: usize) -> Result<Cell> {
        // Without a `values` path the `value` path names the array and each
        // element is used as is.
        let (array_path, per_item_fields) = match &column.data.values {
            Some(values) => (Some(values.as_str()), true),
            None => (column.data.field("value"), false),
        };
        let source = array_path
            .and_then(|p| record.get(p))
            .and_then(Value::as_array);

        let mut items = Vec::new();
        for (idx, item) in source.into_iter().flatten().enumerate() {
            let mut fields = if per_item_fields {
                resolve_fields(column, item)
            } else {
                Fields::new()
            };
            if column.kind == ColumnKind::Objects
                && let Some(template) = &column.data.template
            {
                let text = template
                    .render(item)
                    .map_err(|source| TableError::Template {
                        column: column.label.clone(),
                        record: record.name().to_string(),
                        row,
                        item: idx,
                        source,
                    })?;
                fields.insert("value".to_string(), Value::String(text));
            }
            if !fields.contains_key("value") && (fields.is_empty() || !per_item_fields) {
                fields.insert("value".to_string(), item.clone());
            }
            let data = if column.kind == ColumnKind::Links {
                CellData::Link(fields)
            } else {
                CellData::Text(fields)
            };
            let mut cell = Cell::new(data);
            decorate(&mut cell, column);
            items.push(cell);
        }

        let mut cell = Cell::new(CellData::multi(column.kind, items));
        if let Some(modifier) = &column.modifier {
            if cell.items().is_empty() {
                cell.decoration = modifier.empty_decoration(None);
            }
            cell.preformatted = modifier.preformatted;
        }
        Ok(cell)
    }
}

fn resolve_fields(column: &ColumnDefinition, source: &Value) -> Fields {
    column
        .data
        .fields
        .iter()
        .filter_map(|(name, p)| path::resolve(source, p).map(|v| (name.clone(), v.clone())))
        .collect()
}

fn decorate(cell: &mut Cell, column: &ColumnDefinition) {
    let Some(modifier) = &column.modifier else {
        return;
    };
    let raw = cell.field(cell.kind().primary_field());
    cell.decoration = modifier.decoration(raw);
    cell.preformatted = modifier.preformatted;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ItemTemplate;
    use crate::modifier::Modifier;
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::from_value(value)
    }

    #[test]
    fn percentage_cells_keep_raw_values() {
        let column = ColumnDefinition::scalar("Used (%)", ColumnKind::Percentage, "usedPercentage");
        let cell = CellFactory::create(&column, &record(json!({ "usedPercentage": 9.89 })), 0)
            .unwrap();
        assert_eq!(cell.kind(), ColumnKind::Percentage);
        assert_eq!(cell.value(), Some(&json!(9.89)));
        assert_eq!(cell.decoration, None);
    }

    #[test]
    fn missing_paths_are_absent() {
        let column = ColumnDefinition::scalar("Profile", ColumnKind::Text, "profileRef.name");
        let cell = CellFactory::create(&column, &record(json!({ "profileRef": null })), 0).unwrap();
        assert_eq!(cell.value(), None);
        assert_eq!(cell.display_text(), "");
    }

    #[test]
    fn empty_value_decoration() {
        let column = ColumnDefinition::scalar("A", ColumnKind::Numeric, "propertyA").with_modifier(
            Modifier::new()
                .with_minimum(3.0, "<3")
                .with_value_if_empty("N/A"),
        );
        let cell = CellFactory::create(&column, &record(json!({ "propertyA": null })), 0).unwrap();
        assert_eq!(cell.decoration.as_deref(), Some("N/A"));
    }

    #[test]
    fn link_decoration_reads_label() {
        let column = ColumnDefinition::link("Name", "url", "name")
            .with_modifier(Modifier::new().with_maximum_length(3).preformatted());
        let cell = CellFactory::create(
            &column,
            &record(json!({ "url": "/lightning/r/1", "name": "Account" })),
            0,
        )
        .unwrap();
        assert_eq!(cell.kind(), ColumnKind::Link);
        assert_eq!(cell.decoration.as_deref(), Some("Acc..."));
        assert!(cell.preformatted);
        assert_eq!(cell.label(), Some(&json!("Account")));
    }

    #[test]
    fn links_resolve_companion_fields_per_item() {
        let column = ColumnDefinition::links("Profiles", "profileRefs", "url", "name");
        let cell = CellFactory::create(
            &column,
            &record(json!({ "profileRefs": [
                { "url": "/p/1", "name": "Admin" },
                { "url": "/p/2" },
            ] })),
            0,
        )
        .unwrap();
        let items = cell.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind(), ColumnKind::Link);
        assert_eq!(items[0].label(), Some(&json!("Admin")));
        assert_eq!(items[1].label(), None);
        assert_eq!(items[1].value(), Some(&json!("/p/2")));
    }

    #[test]
    fn texts_use_items_directly() {
        let column = ColumnDefinition::texts("Tags", "tags")
            .with_modifier(Modifier::new().with_value_if_empty("-"));
        let cell = CellFactory::create(&column, &record(json!({ "tags": ["a", ""] })), 0).unwrap();
        assert_eq!(cell.items()[0].value(), Some(&json!("a")));
        assert_eq!(cell.items()[1].decoration.as_deref(), Some("-"));
        assert_eq!(cell.decoration, None);

        let empty = CellFactory::create(&column, &record(json!({})), 0).unwrap();
        assert_eq!(empty.kind(), ColumnKind::Texts);
        assert!(empty.items().is_empty());
        assert_eq!(empty.decoration.as_deref(), Some("-"));
    }

    #[test]
    fn objects_render_through_template() {
        let column = ColumnDefinition::objects(
            "Fields",
            "fields",
            ItemTemplate::pattern("{name} ({type})"),
        );
        let cell = CellFactory::create(
            &column,
            &record(json!({ "fields": [{ "name": "Rating", "type": "Picklist" }] })),
            0,
        )
        .unwrap();
        assert_eq!(cell.items()[0].value(), Some(&json!("Rating (Picklist)")));
    }

    #[test]
    fn template_failures_carry_context() {
        let column = ColumnDefinition::objects(
            "Fields",
            "fields",
            ItemTemplate::new(|_| Err("bad item".into())),
        );
        let err = CellFactory::create(
            &column,
            &record(json!({ "name": "Account", "fields": [1] })),
            4,
        )
        .unwrap_err();
        match err {
            TableError::Template {
                column,
                record,
                row,
                item,
                ..
            } => {
                assert_eq!(column, "Fields");
                assert_eq!(record, "Account");
                assert_eq!(row, 4);
                assert_eq!(item, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn score_cells_read_the_score_card() {
        let mut scored = Record::scored(json!({ "id": "005", "name": "Jane" }));
        scored.mark_bad("lastLogin").unwrap();
        let cell = CellFactory::create(&ColumnDefinition::score("Score"), &scored, 0).unwrap();
        assert_eq!(cell.kind(), ColumnKind::Score);
        assert_eq!(cell.value(), Some(&json!(1)));
        assert_eq!(cell.field("id"), Some(&json!("005")));
    }
}
