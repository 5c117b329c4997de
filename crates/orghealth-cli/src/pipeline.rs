//! Score, build, sort and filter every configured table.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use orghealth_model::{RuleDefinition, RuleRegistry};
use orghealth_table::Table;
use orghealth_xlsx::RawSheet;

use crate::config::{TableConfig, WorkbookConfig};

/// A table ready to be previewed or exported.
#[derive(Debug)]
pub struct PreparedTable {
    pub title: String,
    pub table: Table,
}

impl PreparedTable {
    pub fn visible_count(&self) -> usize {
        self.table.visible_rows().count()
    }

    pub fn bad_count(&self) -> usize {
        self.table
            .visible_rows()
            .filter(|row| row.has_badness())
            .count()
    }
}

#[derive(Debug)]
pub struct PreparedWorkbook {
    pub registry: RuleRegistry,
    pub tables: Vec<PreparedTable>,
}

impl PreparedWorkbook {
    /// One raw sheet per table, rule ids exported as rule descriptions.
    pub fn sheets(&self) -> Vec<RawSheet> {
        self.tables
            .iter()
            .map(|prepared| {
                let exported = prepared
                    .table
                    .export(&prepared.title, |id| self.registry.reason_label(id));
                RawSheet::from(exported)
            })
            .collect()
    }

    pub fn table(&self, title: &str) -> Option<&PreparedTable> {
        self.tables.iter().find(|prepared| prepared.title == title)
    }
}

/// Prepare every table of `config`. Record files are read relative to
/// `base_dir`.
pub fn prepare(config: &WorkbookConfig, base_dir: &Path) -> Result<PreparedWorkbook> {
    let registry: RuleRegistry = config
        .rules
        .iter()
        .cloned()
        .map(RuleDefinition::into_rule)
        .collect();
    let tables = config
        .tables
        .iter()
        .map(|table| prepare_table(table, &registry, base_dir))
        .collect::<Result<Vec<_>>>()?;
    Ok(PreparedWorkbook { registry, tables })
}

fn prepare_table(
    config: &TableConfig,
    registry: &RuleRegistry,
    base_dir: &Path,
) -> Result<PreparedTable> {
    let span = info_span!("table", title = %config.title);
    let _guard = span.enter();

    let mut records = config
        .records
        .load(base_dir)
        .with_context(|| format!("load records for '{}'", config.title))?;
    if !registry.is_empty() {
        registry
            .evaluate_all(&mut records)
            .with_context(|| format!("score records for '{}'", config.title))?;
    }
    let mut table = Table::build(config.definition.clone(), &records)
        .with_context(|| format!("build table '{}'", config.title))?;
    if let Some(sort) = &config.sort {
        let column = sort
            .column
            .resolve(table.definition())
            .with_context(|| format!("sort table '{}'", config.title))?;
        table.sort(column, sort.order)?;
    }
    if let Some(search) = &config.filter {
        table.filter(search);
    }
    info!(
        rows = table.len(),
        visible = table.visible_rows().count(),
        "prepared table"
    );
    Ok(PreparedTable {
        title: config.title.clone(),
        table,
    })
}
