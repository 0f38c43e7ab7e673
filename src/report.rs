//! Directory-level inspection: discovery, per-file summaries, and candidate ranking.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::InspectError;
use crate::inference::Role;
use crate::ingestion::{LoadOptions, SUPPORTED_EXTENSIONS, TracingObserver};
use crate::summary::{TableSummary, summarize_table};

/// Minimum coverage (percent) a column needs to be a modeling candidate.
pub const DEFAULT_MIN_COVERAGE: f64 = 60.0;

/// A column judged usable as a model feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelingCandidate {
    /// `"<file-name>::<column-name>"`.
    pub key: String,
    pub role: Role,
    pub coverage_pct: f64,
    pub distinct_count: usize,
}

/// A file that was discovered but could not be summarized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Result of one inspection run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaReport {
    pub tables: Vec<TableSummary>,
    pub candidates: Vec<ModelingCandidate>,
    pub failures: Vec<FileFailure>,
}

/// Options for [`inspect_directory`].
#[derive(Debug, Clone)]
pub struct InspectOptions {
    /// Directory scanned recursively for tabular files.
    pub data_dir: PathBuf,
    /// Column name to treat as the prediction target in every file.
    pub target: Option<String>,
    /// Passed to every load.
    pub load: LoadOptions,
    /// See [`DEFAULT_MIN_COVERAGE`].
    pub min_coverage: f64,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            target: None,
            load: LoadOptions {
                observer: Some(Arc::new(TracingObserver)),
                ..Default::default()
            },
            min_coverage: DEFAULT_MIN_COVERAGE,
        }
    }
}

/// List every regular file under `dir` (recursively) with a supported extension, sorted by path.
pub fn discover_tables(dir: &Path) -> Result<Vec<PathBuf>, InspectError> {
    if !dir.is_dir() {
        return Err(InspectError::MissingDataDirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("skipping unreadable entry: {err}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if has_supported_extension(&path) {
            files.push(path);
        } else {
            tracing::warn!(path = %path.display(), "skipping unsupported file");
        }
    }

    files.sort();
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
        .unwrap_or(false)
}

/// Collect feature-like columns with enough coverage, best covered first.
///
/// A column qualifies when its role is numeric, categorical or binary and its coverage is at
/// least `min_coverage`. Ties on coverage are ordered by key.
pub fn modeling_candidates(tables: &[TableSummary], min_coverage: f64) -> Vec<ModelingCandidate> {
    let mut candidates: Vec<ModelingCandidate> = tables
        .iter()
        .flat_map(|table| {
            let file_name = table.file_name();
            table
                .columns
                .iter()
                .filter(|c| c.role.is_feature_like() && c.coverage_pct >= min_coverage)
                .map(move |c| ModelingCandidate {
                    key: format!("{file_name}::{}", c.name),
                    role: c.role,
                    coverage_pct: c.coverage_pct,
                    distinct_count: c.distinct_count,
                })
        })
        .collect();

    candidates.sort_by(compare_candidates);
    candidates
}

fn compare_candidates(a: &ModelingCandidate, b: &ModelingCandidate) -> Ordering {
    b.coverage_pct
        .total_cmp(&a.coverage_pct)
        .then_with(|| a.key.cmp(&b.key))
}

/// Scan `options.data_dir`, summarize every supported file, and rank modeling candidates.
///
/// Files are processed one at a time. A file that fails to load is logged as a warning, recorded
/// in [`SchemaReport::failures`] and left out of the tables and candidates.
///
/// # Errors
///
/// - [`InspectError::MissingDataDirectory`] before any processing
/// - [`InspectError::NoFilesFound`] when nothing has a supported extension
/// - [`InspectError::NoSummariesProduced`] when every file failed
pub fn inspect_directory(options: &InspectOptions) -> Result<SchemaReport, InspectError> {
    let paths = discover_tables(&options.data_dir)?;
    if paths.is_empty() {
        return Err(InspectError::NoFilesFound {
            path: options.data_dir.clone(),
        });
    }
    tracing::info!(files = paths.len(), dir = %options.data_dir.display(), "discovered tables");

    let mut tables = Vec::with_capacity(paths.len());
    let mut failures = Vec::new();
    for path in &paths {
        let _span = tracing::debug_span!("summarize", path = %path.display()).entered();
        match summarize_table(path, options.target.as_deref(), &options.load) {
            Ok(summary) => tables.push(summary),
            Err(err) => {
                tracing::warn!(path = %path.display(), "failed to read {}: {err}", path.display());
                failures.push(FileFailure {
                    path: path.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    if tables.is_empty() {
        return Err(InspectError::NoSummariesProduced {
            attempted: paths.len(),
        });
    }

    let candidates = modeling_candidates(&tables, options.min_coverage);
    tracing::info!(
        tables = tables.len(),
        failed = failures.len(),
        candidates = candidates.len(),
        "inspection finished"
    );

    Ok(SchemaReport {
        tables,
        candidates,
        failures,
    })
}
