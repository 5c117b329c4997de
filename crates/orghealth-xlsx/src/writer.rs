//! Workbook writer.
//!
//! Each [`RawSheet`] becomes one worksheet: a bold header row followed by
//! the data rows, with column widths fitted to the content.

use std::borrow::Cow;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use tracing::{debug, warn};

use crate::error::{Result, XlsxError};
use crate::sheet::{MAX_COLUMNS, MAX_ROWS, RawSheet, column_widths, truncate_cell};

/// Incrementally builds a workbook, one sheet at a time.
pub struct WorkbookBuilder {
    workbook: Workbook,
    header_format: Format,
    sheet_names: Vec<String>,
}

impl Default for WorkbookBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkbookBuilder {
    pub fn new() -> Self {
        Self {
            workbook: Workbook::new(),
            header_format: Format::new().set_bold(),
            sheet_names: Vec::new(),
        }
    }

    pub fn sheet_count(&self) -> usize {
        self.sheet_names.len()
    }

    /// Names of the worksheets added so far, in order.
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// Add a worksheet for `sheet`.
    ///
    /// Every cell is validated before anything is written, so a rejected
    /// sheet leaves the workbook untouched.
    pub fn add_sheet(&mut self, sheet: &RawSheet) -> Result<&mut Self> {
        let name = sheet.sheet_name();
        if self
            .sheet_names
            .iter()
            .any(|existing| existing.to_lowercase() == name.to_lowercase())
        {
            return Err(XlsxError::DuplicateSheet { sheet: name });
        }
        // Header row plus data rows.
        if sheet.rows.len() + 1 > MAX_ROWS {
            return Err(XlsxError::TooManyRows {
                sheet: name,
                rows: sheet.rows.len(),
                limit: MAX_ROWS - 1,
            });
        }
        let texts = sheet.cell_texts()?;
        let widths = column_widths(&sheet.columns, &texts);
        if widths.len() > MAX_COLUMNS {
            return Err(XlsxError::TooManyColumns {
                sheet: name,
                columns: widths.len(),
                limit: MAX_COLUMNS,
            });
        }

        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(name.as_str())?;
        for (col, title) in (0u16..).zip(&sheet.columns) {
            worksheet.write_string_with_format(0, col, truncate_cell(title), &self.header_format)?;
        }
        let mut truncated = 0usize;
        for (row, cells) in (1u32..).zip(&texts) {
            for (col, text) in (0u16..).zip(cells) {
                let cell = truncate_cell(text);
                if matches!(cell, Cow::Owned(_)) {
                    truncated += 1;
                }
                worksheet.write_string(row, col, cell)?;
            }
        }
        for (col, width) in (0u16..).zip(&widths) {
            worksheet.set_column_width(col, *width as f64)?;
        }

        if truncated > 0 {
            warn!(sheet = %name, cells = truncated, "truncated oversized cells");
        }
        debug!(
            sheet = %name,
            rows = texts.len(),
            columns = widths.len(),
            "added worksheet"
        );
        self.sheet_names.push(name);
        Ok(self)
    }

    /// Serialize the workbook.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        if self.sheet_names.is_empty() {
            return Err(XlsxError::EmptyWorkbook);
        }
        let bytes = self.workbook.save_to_buffer()?;
        debug!(sheets = self.sheet_names.len(), bytes = bytes.len(), "built workbook");
        Ok(bytes)
    }
}

/// Build a workbook with one worksheet per sheet, in order.
pub fn build_workbook(sheets: &[RawSheet]) -> Result<Vec<u8>> {
    if sheets.is_empty() {
        return Err(XlsxError::EmptyWorkbook);
    }
    let mut builder = WorkbookBuilder::new();
    for sheet in sheets {
        builder.add_sheet(sheet)?;
    }
    builder.finish()
}

/// Build a workbook and write it to `path`.
pub fn write_workbook(path: &Path, sheets: &[RawSheet]) -> Result<()> {
    let bytes = build_workbook(sheets)?;
    std::fs::write(path, &bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote workbook");
    Ok(())
}
