use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use orghealth_cli::pipeline::{PreparedTable, PreparedWorkbook};
use orghealth_table::{BAD_HINT, CellData, Row};
use orghealth_xlsx::RawSheet;

use crate::types::{ExportResult, SheetSummary};

pub fn sheet_summaries(workbook: &PreparedWorkbook, sheets: &[RawSheet]) -> Vec<SheetSummary> {
    workbook
        .tables
        .iter()
        .zip(sheets)
        .map(|(prepared, sheet)| SheetSummary {
            title: prepared.title.clone(),
            sheet_name: sheet.sheet_name(),
            rows: prepared.table.len(),
            exported: sheet.row_count(),
            bad: prepared.bad_count(),
        })
        .collect()
}

pub fn print_summary(result: &ExportResult) {
    println!("Output: {}", result.output.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Sheet"),
        header_cell("Rows"),
        header_cell("Exported"),
        header_cell("Bad"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    let mut total_rows = 0usize;
    let mut total_exported = 0usize;
    let mut total_bad = 0usize;
    for sheet in &result.sheets {
        total_rows += sheet.rows;
        total_exported += sheet.exported;
        total_bad += sheet.bad;
        table.add_row(vec![
            Cell::new(&sheet.title).add_attribute(Attribute::Bold),
            Cell::new(&sheet.sheet_name),
            Cell::new(sheet.rows),
            Cell::new(sheet.exported),
            count_cell(sheet.bad, Color::Red),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        Cell::new(total_exported).add_attribute(Attribute::Bold),
        count_cell(total_bad, Color::Red).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

/// Print up to `limit` visible rows of a prepared table.
pub fn print_preview(prepared: &PreparedTable, limit: usize) {
    let visible = prepared.visible_count();
    println!(
        "{} ({} of {} rows visible)",
        prepared.title,
        visible,
        prepared.table.len()
    );
    let mut table = Table::new();
    table.set_header(
        prepared
            .table
            .definition()
            .columns
            .iter()
            .map(|column| header_cell(&column.label))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for row in prepared.table.visible_rows().take(limit) {
        table.add_row(row.cells.iter().map(|cell| preview_cell(cell, row)));
    }
    println!("{table}");
    if visible > limit {
        println!("... {} more rows", visible - limit);
    }
}

fn preview_cell(cell: &orghealth_table::Cell, row: &Row) -> Cell {
    let text = match &cell.data {
        CellData::Index => row.index.to_string(),
        CellData::Texts(items) | CellData::Links(items) | CellData::Objects(items)
            if cell.decoration.is_none() =>
        {
            items
                .iter()
                .map(orghealth_table::Cell::display_text)
                .collect::<Vec<_>>()
                .join(", ")
        }
        _ => cell.display_text(),
    };
    let out = Cell::new(text);
    if cell.hint.as_deref() == Some(BAD_HINT) {
        out.fg(Color::Red)
    } else if cell.decoration.is_some() {
        out.fg(Color::DarkGrey)
    } else {
        out
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
