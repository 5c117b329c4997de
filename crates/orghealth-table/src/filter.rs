//! Free-text row filter.

use serde_json::Value;

use crate::cell::{Cell, CellData};
use crate::dependencies::DependencySummary;
use crate::row::{Row, reindex_visible};

/// Search strings of this many characters or fewer disable the filter.
pub const FILTER_DISABLED_MAX_LEN: usize = 2;

/// Show only rows with a cell value containing `search`, ignoring case.
///
/// Short searches show every row. Returns the number of visible rows.
pub fn filter_rows(rows: &mut [Row], search: &str) -> usize {
    if search.chars().count() <= FILTER_DISABLED_MAX_LEN {
        for row in rows.iter_mut() {
            row.is_visible = true;
        }
        return reindex_visible(rows);
    }
    let needle = search.to_uppercase();
    for row in rows.iter_mut() {
        row.is_visible = row.cells.iter().any(|cell| cell_matches(cell, &needle));
    }
    reindex_visible(rows)
}

/// True when any resolved value of `cell` contains `needle` (already upper
/// case). Items of multi-valued cells are searched recursively.
pub fn cell_matches(cell: &Cell, needle: &str) -> bool {
    match &cell.data {
        CellData::Index => false,
        CellData::Texts(items) | CellData::Links(items) | CellData::Objects(items) => {
            items.iter().any(|item| cell_matches(item, needle))
        }
        CellData::Dependencies(fields) => {
            match DependencySummary::from_value(fields.get("value")) {
                Some(summary) => summary
                    .labels()
                    .any(|label| label.to_uppercase().contains(needle)),
                None => fields.values().any(|value| value_matches(value, needle)),
            }
        }
        CellData::Score(fields)
        | CellData::Text(fields)
        | CellData::Numeric(fields)
        | CellData::Percentage(fields)
        | CellData::Link(fields)
        | CellData::Boolean(fields)
        | CellData::DateTime(fields) => fields.values().any(|value| value_matches(value, needle)),
    }
}

fn value_matches(value: &Value, needle: &str) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => text.to_uppercase().contains(needle),
        Value::Bool(flag) => flag.to_string().to_uppercase().contains(needle),
        Value::Number(number) => number.to_string().contains(needle),
        Value::Array(items) => items.iter().any(|item| value_matches(item, needle)),
        Value::Object(map) => map.values().any(|item| value_matches(item, needle)),
    }
}
