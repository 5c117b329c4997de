//! Raw worksheet content and the rules that turn it into cell text.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use orghealth_table::ExportedTable;

use crate::error::{Result, XlsxError};

/// Longest sheet name a workbook accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;
/// Longest text a single cell can hold.
pub const MAX_CELL_LEN: usize = 32_767;
/// Appended to cell text cut at [`MAX_CELL_LEN`].
pub const TRUNCATION_MARKER: &str = "[truncated]";
/// Characters a sheet name cannot contain.
pub const ILLEGAL_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];
pub const MIN_COLUMN_WIDTH: usize = 10;
pub const MAX_COLUMN_WIDTH: usize = 255;
pub const MAX_ROWS: usize = 1_048_576;
pub const MAX_COLUMNS: usize = 16_384;

/// One worksheet worth of content: a title, a header row and data rows.
///
/// Cells are kept as JSON values so that callers other than the table
/// exporter can hand over loosely typed data. Only strings and arrays of
/// scalars are written; see [`cell_text`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawSheet {
    pub header: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl RawSheet {
    pub fn new(header: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            header: header.into(),
            columns,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_row(mut self, row: Vec<Value>) -> Self {
        self.rows.push(row);
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Worksheet name, see [`sheet_name`].
    pub fn sheet_name(&self) -> String {
        sheet_name(&self.header, self.row_count())
    }

    /// Render every data cell to text, failing on the first value that
    /// cannot be written.
    pub fn cell_texts(&self) -> Result<Vec<Vec<String>>> {
        let name = self.sheet_name();
        self.rows
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .map(|(column, value)| cell_text(value, &name, row, column))
                    .collect()
            })
            .collect()
    }
}

impl From<ExportedTable> for RawSheet {
    fn from(table: ExportedTable) -> Self {
        Self {
            header: table.header,
            columns: table.columns,
            rows: table
                .rows
                .into_iter()
                .map(|row| row.into_iter().map(Value::String).collect())
                .collect(),
        }
    }
}

/// `"<header> (<row_count>)"`, made safe to use as a sheet name.
///
/// Illegal characters are replaced with `_`, as are leading and trailing
/// apostrophes, and the result is cut to [`MAX_SHEET_NAME_LEN`] characters.
pub fn sheet_name(header: &str, row_count: usize) -> String {
    let full = format!("{header} ({row_count})");
    let mut name: String = full
        .chars()
        .map(|c| if ILLEGAL_SHEET_CHARS.contains(&c) { '_' } else { c })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    if name.starts_with('\'') {
        name.replace_range(..1, "_");
    }
    if name.ends_with('\'') {
        name.pop();
        name.push('_');
    }
    name
}

/// Cut text longer than [`MAX_CELL_LEN`] characters so that, marker
/// included, it fits in one cell.
pub fn truncate_cell(text: &str) -> Cow<'_, str> {
    if text.chars().count() <= MAX_CELL_LEN {
        return Cow::Borrowed(text);
    }
    let keep = MAX_CELL_LEN - TRUNCATION_MARKER.chars().count();
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(TRUNCATION_MARKER);
    Cow::Owned(out)
}

/// Text written for a raw cell.
///
/// Strings are written as they are. Arrays of strings, numbers and booleans
/// are flattened to `[a,b,c]`. Everything else is rejected so that no cell
/// content is silently dropped or reinterpreted.
pub fn cell_text(value: &Value, sheet: &str, row: usize, column: usize) -> Result<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Array(items) => {
            let parts = items
                .iter()
                .map(|item| match item {
                    Value::String(text) => Ok(text.clone()),
                    Value::Number(number) => Ok(number.to_string()),
                    Value::Bool(flag) => Ok(flag.to_string()),
                    other => Err(XlsxError::unsupported(
                        sheet,
                        row,
                        column,
                        array_item_kind(other),
                    )),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("[{}]", parts.join(",")))
        }
        other => Err(XlsxError::unsupported(sheet, row, column, value_kind(other))),
    }
}

/// Column widths: longest text per column, header included, clamped to
/// [`MIN_COLUMN_WIDTH`]..=[`MAX_COLUMN_WIDTH`].
pub fn column_widths(columns: &[String], rows: &[Vec<String>]) -> Vec<usize> {
    let count = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(columns.len()))
        .max()
        .unwrap_or_default();
    let mut widths = vec![MIN_COLUMN_WIDTH; count];
    for line in std::iter::once(columns).chain(rows.iter().map(Vec::as_slice)) {
        for (width, text) in widths.iter_mut().zip(line) {
            *width = (*width).max(text.chars().count());
        }
    }
    for width in &mut widths {
        *width = (*width).min(MAX_COLUMN_WIDTH);
    }
    widths
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn array_item_kind(item: &Value) -> &'static str {
    match item {
        Value::Null => "array containing null",
        Value::Array(_) => "array containing array",
        _ => "array containing object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sheet_names() {
        assert_eq!(sheet_name("T", 1), "T (1)");
        assert_eq!(sheet_name("Fields: a/b", 3), "Fields_ a_b (3)");
        let long = sheet_name("Permission sets with a very long title", 1200);
        assert_eq!(long.chars().count(), MAX_SHEET_NAME_LEN);
        assert!(long.starts_with("Permission sets with a very lon"));
        assert_eq!(sheet_name("'quoted", 0), "_quoted (0)");
    }

    #[test]
    fn truncation_leaves_room_for_the_marker() {
        assert_eq!(truncate_cell("short"), "short");
        let exact = "a".repeat(MAX_CELL_LEN);
        assert!(matches!(truncate_cell(&exact), Cow::Borrowed(_)));

        let cut = truncate_cell(&"b".repeat(40_000)).into_owned();
        assert_eq!(cut.chars().count(), MAX_CELL_LEN);
        assert!(cut.ends_with(TRUNCATION_MARKER));
        assert!(cut.starts_with("bbb"));
    }

    #[test]
    fn arrays_are_flattened() {
        assert_eq!(cell_text(&json!(["a", 1, true]), "S", 0, 0).unwrap(), "[a,1,true]");
        assert_eq!(cell_text(&json!([]), "S", 0, 0).unwrap(), "[]");
    }

    #[test]
    fn non_text_cells_are_rejected() {
        let err = cell_text(&json!(12), "S (1)", 2, 5).unwrap_err();
        match err {
            XlsxError::UnsupportedValue {
                sheet,
                row,
                column,
                kind,
            } => {
                assert_eq!(sheet, "S (1)");
                assert_eq!((row, column, kind), (2, 5, "number"));
            }
            other => panic!("unexpected error: {other}"),
        }
        for value in [json!(null), json!(false), json!({ "a": 1 }), json!([[1]]), json!([null])] {
            assert!(cell_text(&value, "S", 0, 0).is_err(), "{value} accepted");
        }
    }

    #[test]
    fn widths_are_clamped() {
        let columns = vec!["Name".to_string(), "Description".to_string()];
        let rows = vec![vec!["x".to_string(), "y".repeat(300)], vec!["z".to_string()]];
        assert_eq!(column_widths(&columns, &rows), [MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH]);
        assert_eq!(column_widths(&[], &[]), Vec::<usize>::new());
    }

    #[test]
    fn exported_tables_become_string_cells() {
        let sheet = RawSheet::from(ExportedTable {
            header: "Users".to_string(),
            columns: vec!["Name".to_string()],
            rows: vec![vec!["Jane".to_string()]],
        });
        assert_eq!(sheet.rows, [[json!("Jane")]]);
        assert_eq!(sheet.sheet_name(), "Users (1)");
        assert_eq!(sheet.cell_texts().unwrap(), [["Jane"]]);
    }
}
