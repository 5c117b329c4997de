//! The table engine: owner of a definition and the rows built from it.

use tracing::debug;

use orghealth_model::Record;

use crate::cell::Cell;
use crate::column::TableDefinition;
use crate::error::Result;
use crate::export::{ExportedTable, export_rows};
use crate::filter::filter_rows;
use crate::row::{Row, build_rows};
use crate::sort::{SortOrder, sort_rows};

/// Hint attached by [`Table::build`] to bad cells and rows with a score.
pub const BAD_HINT: &str = "bad";

/// A built table. Rows are owned here and every mutation (sort, filter)
/// goes through this type so that row indexes stay consistent.
#[derive(Debug, Clone)]
pub struct Table {
    definition: TableDefinition,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table hinting bad cells and rows with [`BAD_HINT`].
    pub fn build(definition: TableDefinition, records: &[Record]) -> Result<Self> {
        Self::build_with(
            definition,
            records,
            |cell: &mut Cell, is_bad, _, _| {
                if is_bad {
                    cell.hint = Some(BAD_HINT.to_string());
                }
            },
            |row: &mut Row, has_badness, _| {
                if has_badness {
                    row.hint = Some(BAD_HINT.to_string());
                }
            },
        )
    }

    /// Build a table with caller-supplied per-cell and per-row hooks.
    pub fn build_with<C, R>(
        definition: TableDefinition,
        records: &[Record],
        on_each_cell: C,
        on_each_row: R,
    ) -> Result<Self>
    where
        C: FnMut(&mut Cell, bool, usize, usize),
        R: FnMut(&mut Row, bool, usize),
    {
        let rows = build_rows(&definition, records, on_each_cell, on_each_row)?;
        debug!(
            rows = rows.len(),
            columns = definition.len(),
            "built table"
        );
        Ok(Self { definition, rows })
    }

    pub fn definition(&self) -> &TableDefinition {
        &self.definition
    }

    /// All rows in their current order, hidden ones included.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|row| row.is_visible)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn sort(&mut self, column_index: usize, order: SortOrder) -> Result<()> {
        sort_rows(&self.definition, &mut self.rows, column_index, order)?;
        debug!(column = column_index, ?order, "sorted table");
        Ok(())
    }

    /// Apply a free-text filter and return the number of visible rows.
    pub fn filter(&mut self, search: &str) -> usize {
        let visible = filter_rows(&mut self.rows, search);
        debug!(search, visible, total = self.rows.len(), "filtered table");
        visible
    }

    pub fn export<F>(&self, title: &str, reason_label: F) -> ExportedTable
    where
        F: Fn(u32) -> Option<String>,
    {
        let exported = export_rows(&self.definition, &self.rows, title, reason_label);
        debug!(
            title,
            rows = exported.rows.len(),
            columns = exported.columns.len(),
            "exported table"
        );
        exported
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}
