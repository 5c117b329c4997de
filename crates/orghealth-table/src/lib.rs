//! Declarative table engine for org health reports.
//!
//! A [`TableDefinition`] describes columns; [`Table::build`] turns scored
//! [`orghealth_model::Record`]s into typed [`Cell`]s and [`Row`]s that can
//! be sorted, filtered and flattened into an [`ExportedTable`].
//!
//! # Example
//!
//! ```
//! use orghealth_model::Record;
//! use orghealth_table::{ColumnDefinition, ColumnKind, SortOrder, Table, TableDefinition};
//! use serde_json::json;
//!
//! let definition = TableDefinition::new(vec![
//!     ColumnDefinition::index("#"),
//!     ColumnDefinition::scalar("Name", ColumnKind::Text, "name"),
//! ]);
//! let records = vec![
//!     Record::new(json!({ "name": "Zulu" })),
//!     Record::new(json!({ "name": "alpha" })),
//! ];
//! let mut table = Table::build(definition, &records)?;
//! table.sort(1, SortOrder::Asc)?;
//! let exported = table.export("Accounts", |_| None);
//! assert_eq!(exported.rows[0], ["1", "alpha"]);
//! # Ok::<(), orghealth_table::TableError>(())
//! ```

pub mod cell;
pub mod column;
pub mod dependencies;
pub mod error;
pub mod export;
pub mod filter;
pub mod modifier;
pub mod row;
pub mod sort;
pub mod table;

pub use cell::{Cell, CellData, CellFactory, Fields};
pub use column::{
    ColumnDefinition, ColumnKind, DataLocator, ItemTemplate, Orientation, TableDefinition,
};
pub use dependencies::DependencySummary;
pub use error::{Result, TableError};
pub use export::{ExportedTable, column_headers, export_rows};
pub use filter::{FILTER_DISABLED_MAX_LEN, filter_rows};
pub use modifier::Modifier;
pub use row::{Row, build_rows, is_bad_cell};
pub use sort::{SortOrder, sort_rows};
pub use table::{BAD_HINT, Table};
