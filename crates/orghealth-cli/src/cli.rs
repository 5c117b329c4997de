//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "orghealth",
    version,
    about = "Score org metadata records and export them as spreadsheet tables",
    long_about = "Score org metadata records against declarative rules, build \
                  sortable/filterable tables from column definitions and export \
                  them as an XLSX workbook."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build every configured table and write the workbook.
    Export(ExportArgs),

    /// Print the built rows of the configured tables.
    Preview(PreviewArgs),
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Workbook configuration (JSON).
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Destination XLSX file.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: PathBuf,

    /// Exit with status 1 when any exported row has bad fields.
    #[arg(long = "fail-on-bad")]
    pub fail_on_bad: bool,
}

#[derive(Parser)]
pub struct PreviewArgs {
    /// Workbook configuration (JSON).
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Only preview the table with this title.
    #[arg(long = "table", value_name = "NAME")]
    pub table: Option<String>,

    /// Maximum number of rows printed per table.
    #[arg(long = "limit", value_name = "N", default_value_t = 20)]
    pub limit: usize,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
