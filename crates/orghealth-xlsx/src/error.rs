//! Error types for spreadsheet export.

use thiserror::Error;

/// Errors that can occur when building a workbook.
#[derive(Debug, Error)]
pub enum XlsxError {
    /// A workbook needs at least one worksheet.
    #[error("cannot build a workbook without worksheets")]
    EmptyWorkbook,

    /// A raw cell holds a value that has no faithful text form.
    #[error("sheet '{sheet}', row {row}, column {column}: unsupported cell value of type {kind}")]
    UnsupportedValue {
        sheet: String,
        row: usize,
        column: usize,
        kind: &'static str,
    },

    /// Two sheets map to the same worksheet name.
    #[error("duplicate sheet name: {sheet}")]
    DuplicateSheet { sheet: String },

    /// Sheet has more rows than a worksheet can hold.
    #[error("sheet '{sheet}' has {rows} rows, the limit is {limit}")]
    TooManyRows {
        sheet: String,
        rows: usize,
        limit: usize,
    },

    /// Sheet has more columns than a worksheet can hold.
    #[error("sheet '{sheet}' has {columns} columns, the limit is {limit}")]
    TooManyColumns {
        sheet: String,
        columns: usize,
        limit: usize,
    },

    /// Error reported by the underlying XLSX writer.
    #[error("XLSX writer error: {0}")]
    Writer(#[from] rust_xlsxwriter::XlsxError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for spreadsheet export.
pub type Result<T> = std::result::Result<T, XlsxError>;

impl XlsxError {
    pub(crate) fn unsupported(
        sheet: &str,
        row: usize,
        column: usize,
        kind: &'static str,
    ) -> Self {
        Self::UnsupportedValue {
            sheet: sheet.to_string(),
            row,
            column,
            kind,
        }
    }
}
