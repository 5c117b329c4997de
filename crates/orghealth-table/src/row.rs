//! Rows and the factory that assembles them from records.

use orghealth_model::Record;

use crate::cell::{Cell, CellFactory};
use crate::column::{ColumnDefinition, TableDefinition};
use crate::error::Result;

/// One record rendered against a table definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 1-based position among visible rows.
    pub index: usize,
    pub name: String,
    pub score: u32,
    pub bad_fields: Vec<String>,
    pub bad_reason_ids: Vec<u32>,
    pub cells: Vec<Cell>,
    pub is_visible: bool,
    /// Presentation hint attached by row-building callbacks.
    pub hint: Option<String>,
}

impl Row {
    pub fn has_badness(&self) -> bool {
        self.score > 0
    }
}

/// Build one row per record, in input order.
///
/// `on_each_cell(cell, is_bad_cell, row_idx, col_idx)` runs for every cell
/// and `on_each_row(row, has_badness, row_idx)` once per row after its cells
/// are built. Indexes passed to callbacks are 0-based positions.
pub fn build_rows<C, R>(
    definition: &TableDefinition,
    records: &[Record],
    mut on_each_cell: C,
    mut on_each_row: R,
) -> Result<Vec<Row>>
where
    C: FnMut(&mut Cell, bool, usize, usize),
    R: FnMut(&mut Row, bool, usize),
{
    let mut rows = Vec::with_capacity(records.len());
    for (row_idx, record) in records.iter().enumerate() {
        let bad_fields = record.bad_fields();
        let mut cells = Vec::with_capacity(definition.len());
        for (col_idx, column) in definition.columns.iter().enumerate() {
            let mut cell = CellFactory::create(column, record, row_idx)?;
            let is_bad = is_bad_cell(column, bad_fields);
            on_each_cell(&mut cell, is_bad, row_idx, col_idx);
            cells.push(cell);
        }
        let mut row = Row {
            index: row_idx + 1,
            name: record.name().to_string(),
            score: record.score().unwrap_or_default(),
            bad_fields: bad_fields.to_vec(),
            bad_reason_ids: record.bad_reason_ids().to_vec(),
            cells,
            is_visible: true,
            hint: None,
        };
        let has_badness = row.has_badness();
        on_each_row(&mut row, has_badness, row_idx);
        rows.push(row);
    }
    Ok(rows)
}

/// A cell is bad when one of its column's paths, or a path below it, was
/// marked bad on the record.
pub fn is_bad_cell(column: &ColumnDefinition, bad_fields: &[String]) -> bool {
    column.paths().iter().any(|path| {
        bad_fields.iter().any(|field| {
            field == path
                || field
                    .strip_prefix(path)
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    })
}

/// Assign dense 1-based indexes to visible rows, in their current order.
/// Hidden rows keep whatever index they had.
pub(crate) fn reindex_visible(rows: &mut [Row]) -> usize {
    let mut next = 0;
    for row in rows.iter_mut().filter(|row| row.is_visible) {
        next += 1;
        row.index = next;
    }
    next
}
