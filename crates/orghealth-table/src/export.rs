//! Flattening of a row set into a string-only table.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use orghealth_model::path;

use crate::cell::{Cell, CellData};
use crate::column::{ColumnDefinition, ColumnKind, TableDefinition};
use crate::dependencies::DependencySummary;
use crate::row::Row;

/// Header of the second column produced by score columns.
pub const REASONS_HEADER: &str = "Reasons";
pub const USED_HEADER: &str = "List of used";
pub const REFERENCED_HEADER: &str = "List of referenced";

/// A table flattened to strings, ready for spreadsheet serialization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportedTable {
    pub header: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Number of exported columns a column expands to.
pub fn expansion_width(kind: ColumnKind) -> usize {
    match kind {
        ColumnKind::Score | ColumnKind::Link | ColumnKind::Links | ColumnKind::Dependencies => 2,
        _ => 1,
    }
}

/// Exported header strings of one column.
pub fn column_headers(column: &ColumnDefinition) -> Vec<String> {
    let label = &column.label;
    match column.kind {
        ColumnKind::Score => vec![label.clone(), REASONS_HEADER.to_string()],
        ColumnKind::Link | ColumnKind::Links => {
            vec![format!("{label} (label)"), format!("{label} (URL)")]
        }
        ColumnKind::Dependencies => {
            vec![USED_HEADER.to_string(), REFERENCED_HEADER.to_string()]
        }
        _ => vec![label.clone()],
    }
}

/// Flatten the visible rows, in their current order.
///
/// `reason_label` maps a bad reason id to the text exported in the
/// `Reasons` column; ids it does not know are exported as numbers.
pub fn export_rows<F>(
    definition: &TableDefinition,
    rows: &[Row],
    title: &str,
    reason_label: F,
) -> ExportedTable
where
    F: Fn(u32) -> Option<String>,
{
    let columns = definition
        .columns
        .iter()
        .flat_map(column_headers)
        .collect::<Vec<_>>();
    let rows = rows
        .iter()
        .filter(|row| row.is_visible)
        .map(|row| {
            let mut out = Vec::with_capacity(columns.len());
            for cell in &row.cells {
                export_cell(cell, row, &reason_label, &mut out);
            }
            out
        })
        .collect();
    ExportedTable {
        header: title.to_string(),
        columns,
        rows,
    }
}

fn export_cell<F>(cell: &Cell, row: &Row, reason_label: &F, out: &mut Vec<String>)
where
    F: Fn(u32) -> Option<String>,
{
    match &cell.data {
        CellData::Index => out.push(row.index.to_string()),
        CellData::Score(fields) => {
            let score = fields
                .get("value")
                .map_or_else(|| row.score.to_string(), path::to_text);
            let reasons = row
                .bad_reason_ids
                .iter()
                .map(|&id| reason_label(id).unwrap_or_else(|| id.to_string()))
                .collect::<Vec<_>>();
            out.push(score);
            out.push(json_list(reasons));
        }
        CellData::Link(fields) => {
            out.push(path::opt_to_text(fields.get("label")));
            out.push(path::opt_to_text(fields.get("value")));
        }
        CellData::Links(items) => {
            out.push(json_list(items.iter().map(|item| path::opt_to_text(item.label()))));
            out.push(json_list(items.iter().map(|item| path::opt_to_text(item.value()))));
        }
        CellData::Dependencies(fields) => {
            match DependencySummary::from_value(fields.get("value")) {
                Some(summary) => {
                    out.push(json_list(summary.using_labels()));
                    out.push(json_list(summary.referenced_labels()));
                }
                None => {
                    out.push(String::new());
                    out.push(String::new());
                }
            }
        }
        CellData::Texts(items) | CellData::Objects(items) => {
            out.push(json_list(items.iter().map(|item| path::opt_to_text(item.value()))));
        }
        CellData::Text(fields)
        | CellData::Numeric(fields)
        | CellData::Percentage(fields)
        | CellData::Boolean(fields)
        | CellData::DateTime(fields) => out.push(path::opt_to_text(fields.get("value"))),
    }
}

/// JSON array text of a list of strings, e.g. `["a","b"]`.
fn json_list<I>(items: I) -> String
where
    I: IntoIterator<Item = String>,
{
    Value::Array(items.into_iter().map(Value::String).collect()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_expansion() {
        let score = ColumnDefinition::score("Score");
        assert_eq!(column_headers(&score), ["Score", "Reasons"]);
        let link = ColumnDefinition::link("Name", "url", "name");
        assert_eq!(column_headers(&link), ["Name (label)", "Name (URL)"]);
        let deps = ColumnDefinition::dependencies("Dependencies", "dependencies");
        assert_eq!(column_headers(&deps), ["List of used", "List of referenced"]);
        let text = ColumnDefinition::scalar("Notes", ColumnKind::Text, "notes");
        assert_eq!(column_headers(&text), ["Notes"]);
        for kind in ColumnKind::all() {
            let column = ColumnDefinition::new("X", *kind);
            assert_eq!(column_headers(&column).len(), expansion_width(*kind));
        }
    }

    #[test]
    fn json_lists() {
        assert_eq!(json_list(Vec::new()), "[]");
        assert_eq!(
            json_list(vec!["a".to_string(), "b\"c".to_string()]),
            r#"["a","b\"c"]"#
        );
    }
}
