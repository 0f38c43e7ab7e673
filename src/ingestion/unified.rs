//! Unified loading entrypoint.
//!
//! Most callers should use [`load_table`], which reads a file into an in-memory
//! [`crate::types::DataSet`] with column types inferred from the content.
//!
//! - If [`LoadOptions::format`] is `None`, the format is inferred from the file extension.
//! - If a [`super::observability::LoadObserver`] is provided, success/failure is reported to it.

use std::error::Error as StdError;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{LoadError, LoadResult};
use crate::types::DataSet;

use super::observability::{LoadContext, LoadObserver, LoadSeverity, LoadStats};
use super::{csv, feather, parquet};

/// File extensions (lowercase, without the dot) that discovery picks up.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "parquet", "feather", "xlsx", "xls"];

/// Supported table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma-separated values.
    Csv,
    /// Apache Parquet.
    Parquet,
    /// Feather / Arrow IPC file.
    Feather,
    /// Spreadsheet workbooks (feature-gated behind `excel`).
    Excel,
}

impl TableFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "parquet" => Some(Self::Parquet),
            "feather" => Some(Self::Feather),
            "xlsx" | "xls" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Infer the format of `path` from its extension.
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: ext.to_string(),
        })
    }

    /// Whether the reader for this format honors [`LoadOptions::sample_rows`].
    ///
    /// Columnar formats are always read in full.
    pub fn supports_row_cap(&self) -> bool {
        matches!(self, Self::Csv | Self::Excel)
    }
}

/// How to choose the sheet when loading an Excel workbook.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExcelSheetSelection {
    /// Load the first sheet (default).
    #[default]
    First,
    /// Load a single named sheet.
    Sheet(String),
}

/// Options controlling table loading.
///
/// Use [`Default`] for common cases.
#[derive(Clone, Default)]
pub struct LoadOptions {
    /// If `None`, detect the format from the file extension.
    pub format: Option<TableFormat>,
    /// Maximum number of data rows to read (row-oriented formats only).
    pub sample_rows: Option<usize>,
    /// Excel-specific options.
    pub excel_sheet_selection: ExcelSheetSelection,
    /// Optional observer for logging.
    pub observer: Option<Arc<dyn LoadObserver>>,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("format", &self.format)
            .field("sample_rows", &self.sample_rows)
            .field("excel_sheet_selection", &self.excel_sheet_selection)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

/// Load one tabular file into memory.
///
/// When an observer is configured, this function reports `on_success` with row/column counts
/// or `on_failure` with a computed severity.
///
/// ```no_run
/// use schema_inspector::ingestion::{load_table, LoadOptions};
///
/// # fn main() -> Result<(), schema_inspector::LoadError> {
/// let opts = LoadOptions {
///     sample_rows: Some(1_000),
///     ..Default::default()
/// };
/// let ds = load_table("data/customers.csv", &opts)?;
/// println!("rows={} columns={}", ds.row_count(), ds.schema.fields.len());
/// # Ok(())
/// # }
/// ```
pub fn load_table(path: impl AsRef<Path>, options: &LoadOptions) -> LoadResult<DataSet> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => TableFormat::from_path(path)?,
    };

    let ctx = LoadContext {
        path: path.to_path_buf(),
        format: fmt,
    };

    if options.sample_rows.is_some() && !fmt.supports_row_cap() {
        tracing::debug!(format = ?fmt, path = %path.display(), "row cap ignored for columnar format");
    }

    let result = match fmt {
        TableFormat::Csv => csv::load_csv_from_path(path, options.sample_rows),
        TableFormat::Parquet => parquet::load_parquet_from_path(path),
        TableFormat::Feather => feather::load_feather_from_path(path),
        TableFormat::Excel => load_excel_dispatch(path, options),
    };

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(ds) => obs.on_success(
                &ctx,
                LoadStats {
                    rows: ds.row_count(),
                    columns: ds.schema.fields.len(),
                },
            ),
            Err(e) => obs.on_failure(&ctx, severity_for_error(e), e),
        }
    }

    result
}

pub(crate) fn severity_for_error(e: &LoadError) -> LoadSeverity {
    match e {
        LoadError::Io(_) => LoadSeverity::Critical,
        LoadError::Parquet(err) => {
            if error_chain_contains_io(err) {
                LoadSeverity::Critical
            } else {
                LoadSeverity::Error
            }
        }
        LoadError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => LoadSeverity::Critical,
            _ => LoadSeverity::Error,
        },
        LoadError::Feather(err) => {
            if error_chain_contains_io(err) {
                LoadSeverity::Critical
            } else {
                LoadSeverity::Error
            }
        }
        #[cfg(feature = "excel")]
        LoadError::Excel(_) => LoadSeverity::Error,
        LoadError::UnsupportedFormat { .. } | LoadError::Malformed { .. } => LoadSeverity::Error,
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

fn load_excel_dispatch(path: &Path, options: &LoadOptions) -> LoadResult<DataSet> {
    // Avoid unused warnings when the feature is off.
    let _ = (path, options);

    #[cfg(feature = "excel")]
    {
        use super::excel;

        let sheet = match &options.excel_sheet_selection {
            ExcelSheetSelection::First => None,
            ExcelSheetSelection::Sheet(name) => Some(name.as_str()),
        };
        excel::load_excel_from_path(path, sheet, options.sample_rows)
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(LoadError::Malformed {
            message: "excel support not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}
