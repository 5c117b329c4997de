//! Workbook configuration file.
//!
//! ```json
//! {
//!   "rules": [
//!     { "id": 1, "description": "No description", "check": "empty", "path": "description" }
//!   ],
//!   "tables": [
//!     {
//!       "title": "Fields",
//!       "definition": { "columns": [ { "label": "#", "type": "index" } ] },
//!       "records": "fields.json",
//!       "sort": { "column": "Score", "order": "desc" },
//!       "filter": "account"
//!     }
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use orghealth_model::{Record, RuleDefinition};
use orghealth_table::{SortOrder, TableDefinition};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkbookConfig {
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
    pub tables: Vec<TableConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    pub title: String,
    pub definition: TableDefinition,
    pub records: RecordSource,
    #[serde(default)]
    pub sort: Option<SortConfig>,
    #[serde(default)]
    pub filter: Option<String>,
}

/// Records given inline or as a path to a JSON array, relative to the
/// configuration file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecordSource {
    Inline(Vec<Record>),
    Path(PathBuf),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SortConfig {
    pub column: ColumnRef,
    #[serde(default)]
    pub order: SortOrder,
}

/// A column named by position or by label.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    Index(usize),
    Label(String),
}

impl ColumnRef {
    /// Position of the referenced column in `definition`.
    pub fn resolve(&self, definition: &TableDefinition) -> Result<usize> {
        match self {
            Self::Index(index) if *index < definition.len() => Ok(*index),
            Self::Index(index) => bail!(
                "sort column {index} is out of range ({} columns)",
                definition.len()
            ),
            Self::Label(label) => definition
                .columns
                .iter()
                .position(|column| &column.label == label)
                .with_context(|| format!("no column labelled '{label}'")),
        }
    }
}

impl RecordSource {
    /// Materialize the records, reading files relative to `base_dir`.
    pub fn load(&self, base_dir: &Path) -> Result<Vec<Record>> {
        match self {
            Self::Inline(records) => Ok(records.clone()),
            Self::Path(path) => {
                let path = base_dir.join(path);
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("read records {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parse records {}", path.display()))
            }
        }
    }
}

impl WorkbookConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        if config.tables.is_empty() {
            bail!("configuration lists no tables");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orghealth_table::ColumnDefinition;

    #[test]
    fn parses_inline_and_path_sources() {
        let config = WorkbookConfig::from_json(
            r#"{
                "tables": [
                    { "title": "A", "definition": { "columns": [] }, "records": [{ "name": "x" }] },
                    { "title": "B", "definition": { "columns": [] }, "records": "b.json",
                      "sort": { "column": 0 }, "filter": "abc" }
                ]
            }"#,
        )
        .unwrap();
        assert!(config.rules.is_empty());
        assert!(matches!(&config.tables[0].records, RecordSource::Inline(r) if r.len() == 1));
        assert!(matches!(&config.tables[1].records, RecordSource::Path(p) if p == Path::new("b.json")));
        let sort = config.tables[1].sort.as_ref().unwrap();
        assert_eq!(sort.column, ColumnRef::Index(0));
        assert_eq!(sort.order, SortOrder::Asc);
    }

    #[test]
    fn empty_table_list_is_rejected() {
        let err = WorkbookConfig::from_json(r#"{ "tables": [] }"#).unwrap_err();
        assert_eq!(err.to_string(), "configuration lists no tables");
    }

    #[test]
    fn column_refs_resolve_by_label_or_index() {
        let definition = TableDefinition::new(vec![
            ColumnDefinition::index("#"),
            ColumnDefinition::score("Score"),
        ]);
        assert_eq!(ColumnRef::Label("Score".into()).resolve(&definition).unwrap(), 1);
        assert_eq!(ColumnRef::Index(0).resolve(&definition).unwrap(), 0);
        assert!(ColumnRef::Index(2).resolve(&definition).is_err());
        assert!(ColumnRef::Label("Name".into()).resolve(&definition).is_err());
    }
}
