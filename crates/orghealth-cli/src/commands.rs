use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use orghealth_cli::config::WorkbookConfig;
use orghealth_cli::pipeline::{PreparedWorkbook, prepare};
use orghealth_xlsx::write_workbook;

use crate::cli::{ExportArgs, PreviewArgs};
use crate::summary::{print_preview, sheet_summaries};
use crate::types::ExportResult;

pub fn run_export(args: &ExportArgs) -> Result<ExportResult> {
    let span = info_span!("export", config = %args.config.display());
    let _guard = span.enter();
    let workbook = load(&args.config)?;
    let sheets = workbook.sheets();
    write_workbook(&args.output, &sheets)
        .with_context(|| format!("write workbook {}", args.output.display()))?;
    info!(
        output = %args.output.display(),
        sheets = sheets.len(),
        "wrote workbook"
    );
    Ok(ExportResult::new(
        args.output.clone(),
        sheet_summaries(&workbook, &sheets),
    ))
}

pub fn run_preview(args: &PreviewArgs) -> Result<()> {
    let workbook = load(&args.config)?;
    let selected: Vec<_> = match &args.table {
        Some(title) => match workbook.table(title) {
            Some(prepared) => vec![prepared],
            None => bail!("no table titled '{title}'"),
        },
        None => workbook.tables.iter().collect(),
    };
    for prepared in selected {
        print_preview(prepared, args.limit);
    }
    Ok(())
}

fn load(config_path: &Path) -> Result<PreparedWorkbook> {
    let config = WorkbookConfig::load(config_path)?;
    let base_dir = config_path
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    prepare(&config, &base_dir)
}
