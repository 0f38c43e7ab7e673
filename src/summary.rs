//! Per-file schema summaries.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::LoadResult;
use crate::inference::{ColumnNote, Role, infer_role};
use crate::ingestion::{LoadOptions, load_table};
use crate::profile::ColumnProfile;
use crate::types::{DataSet, DataType};

/// Summary of one column of one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: DataType,
    pub role: Role,
    /// Percentage of non-missing values, in `[0, 100]`.
    #[serde(rename = "non_null_pct")]
    pub coverage_pct: f64,
    /// Distinct values, missing counted as one category.
    #[serde(rename = "unique_values")]
    pub distinct_count: usize,
    #[serde(rename = "example_values")]
    pub examples: Vec<String>,
    pub notes: Vec<ColumnNote>,
}

/// Summary of one successfully loaded file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    pub file_path: PathBuf,
    pub row_count: usize,
    pub columns: Vec<ColumnSummary>,
}

impl TableSummary {
    /// Final path component, used to key modeling candidates and title report sections.
    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_path.display().to_string())
    }
}

/// Load `path` and summarize every column.
pub fn summarize_table(
    path: impl AsRef<Path>,
    target: Option<&str>,
    options: &LoadOptions,
) -> LoadResult<TableSummary> {
    let path = path.as_ref();
    let dataset = load_table(path, options)?;
    Ok(summarize_dataset(path, &dataset, target))
}

/// Summarize an already loaded dataset, keeping the column order.
pub fn summarize_dataset(path: impl Into<PathBuf>, dataset: &DataSet, target: Option<&str>) -> TableSummary {
    let columns = dataset
        .schema
        .fields
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let profile = ColumnProfile::from_values(field.data_type, dataset.column(idx));
            let inference = infer_role(&field.name, &profile, target);
            ColumnSummary {
                name: field.name.clone(),
                dtype: field.data_type,
                role: inference.role,
                coverage_pct: profile.coverage_pct(),
                distinct_count: profile.distinct_with_missing,
                examples: profile.examples,
                notes: inference.notes,
            }
        })
        .collect();

    TableSummary {
        file_path: path.into(),
        row_count: dataset.row_count(),
        columns,
    }
}
