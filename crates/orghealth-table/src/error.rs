//! Error types for table construction and manipulation.

use orghealth_model::BoxError;
use thiserror::Error;

/// Errors that can occur when building or sorting tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// An object-list template failed while rendering one item of a cell.
    #[error("template for column '{column}' failed on item {item} of record '{record}' (row {row})")]
    Template {
        column: String,
        record: String,
        row: usize,
        item: usize,
        #[source]
        source: BoxError,
    },

    /// A sort was requested on a column that does not exist.
    #[error("column index {index} out of range for a table with {count} columns")]
    ColumnOutOfRange { index: usize, count: usize },
}

pub type Result<T> = std::result::Result<T, TableError>;
