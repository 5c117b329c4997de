//! Spreadsheet (XLSX) export of flattened tables.
//!
//! Every [`RawSheet`] becomes one worksheet named `"<header> (<rows>)"`.
//! The writer is strict: cells must be strings or arrays of scalars, and
//! anything else is an [`XlsxError::UnsupportedValue`] rather than a
//! silently dropped value.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use orghealth_xlsx::{RawSheet, write_workbook};
//! use serde_json::json;
//!
//! let sheet = RawSheet::new("T", vec!["A".to_string(), "B".to_string()])
//!     .with_row(vec![json!("x"), json!("y")]);
//! write_workbook(Path::new("report.xlsx"), &[sheet]).unwrap();
//! ```

pub mod error;
pub mod sheet;
pub mod writer;

pub use error::{Result, XlsxError};
pub use sheet::{
    MAX_CELL_LEN, MAX_SHEET_NAME_LEN, RawSheet, TRUNCATION_MARKER, cell_text, column_widths,
    sheet_name, truncate_cell,
};
pub use writer::{WorkbookBuilder, build_workbook, write_workbook};
