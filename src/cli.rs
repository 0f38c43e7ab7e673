//! Command-line interface.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};

use crate::error::InspectError;
use crate::ingestion::{ExcelSheetSelection, LoadOptions, TracingObserver};
use crate::logging::{LogConfig, LogFormat};
use crate::render::{render_json, render_markdown};
use crate::report::{DEFAULT_MIN_COVERAGE, InspectOptions, inspect_directory};

#[derive(Debug, Parser)]
#[command(
    name = "schema-inspector",
    version,
    about = "Summarize the schemas of tabular files in a directory",
    long_about = "Scan a directory for CSV, Parquet, Feather and Excel files and print a Markdown \
                  summary: per-column type, suggested role, coverage, cardinality and notes, \
                  followed by a ranked list of modeling candidates."
)]
pub struct Cli {
    /// Directory with source datasets (scanned recursively).
    #[arg(long = "data-dir", value_name = "DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Target column for modeling.
    #[arg(long = "target", value_name = "COLUMN")]
    pub target: Option<String>,

    /// Number of rows to read from CSV/Excel files (Parquet and Feather are read in full).
    #[arg(long = "sample-rows", value_name = "N")]
    pub sample_rows: Option<usize>,

    /// Also write the Markdown summary to this file.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Also write the per-file summaries as JSON to this file.
    #[arg(long = "json-output", value_name = "PATH")]
    pub json_output: Option<PathBuf>,

    /// Minimum coverage (percent) for a modeling candidate.
    #[arg(long = "min-coverage", value_name = "PCT", default_value_t = DEFAULT_MIN_COVERAGE)]
    pub min_coverage: f64,

    /// Sheet to read from Excel workbooks (default: the first sheet).
    #[arg(long = "excel-sheet", value_name = "NAME")]
    pub excel_sheet: Option<String>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl Cli {
    /// Logging configuration derived from the flags.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level_filter: self.verbosity.tracing_level_filter(),
            use_env_filter: !self.verbosity.is_present(),
            format: match self.log_format {
                LogFormatArg::Pretty => LogFormat::Pretty,
                LogFormatArg::Compact => LogFormat::Compact,
                LogFormatArg::Json => LogFormat::Json,
            },
            log_file: self.log_file.clone(),
            with_ansi: self.log_file.is_none() && io::stderr().is_terminal(),
        }
    }

    /// Inspection options derived from the flags.
    pub fn inspect_options(&self) -> InspectOptions {
        InspectOptions {
            data_dir: self.data_dir.clone(),
            target: self.target.clone(),
            load: LoadOptions {
                sample_rows: self.sample_rows,
                excel_sheet_selection: self
                    .excel_sheet
                    .clone()
                    .map_or(ExcelSheetSelection::First, ExcelSheetSelection::Sheet),
                observer: Some(Arc::new(TracingObserver)),
                ..Default::default()
            },
            min_coverage: self.min_coverage,
        }
    }
}

/// Run one inspection and write the outputs.
///
/// The Markdown report goes to `stdout` only when the run succeeds.
pub fn run(cli: &Cli, stdout: &mut impl Write) -> Result<(), InspectError> {
    let report = inspect_directory(&cli.inspect_options())?;
    let markdown = render_markdown(&report);

    writeln!(stdout, "{markdown}").map_err(|source| InspectError::Output {
        path: PathBuf::from("<stdout>"),
        source,
    })?;

    if let Some(path) = &cli.output {
        write_file(path, &markdown)?;
    }
    if let Some(path) = &cli.json_output {
        write_file(path, &render_json(&report.tables)?)?;
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<(), InspectError> {
    fs::write(path, contents).map_err(|source| InspectError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "wrote report");
    Ok(())
}

/// Process exit status for a finished run.
///
/// A missing data directory is a usage error (2, like a bad argument); every other failure is 1.
pub fn exit_status(result: &Result<(), InspectError>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(InspectError::MissingDataDirectory { .. }) => 2,
        Err(_) => 1,
    }
}
