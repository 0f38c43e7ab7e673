//! Single-pass column statistics.

use std::collections::HashSet;

use crate::types::{DataType, Value};

/// How many distinct example values a profile keeps.
pub const MAX_EXAMPLES: usize = 3;

/// Counts gathered from one pass over a column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    /// Declared/inferred type of the column.
    pub data_type: DataType,
    /// Total number of rows, missing included.
    pub row_count: usize,
    /// Rows holding a non-missing value.
    pub non_missing: usize,
    /// Distinct non-missing values.
    pub distinct_non_missing: usize,
    /// Distinct values with all missing values counted as one extra category.
    pub distinct_with_missing: usize,
    /// Up to [`MAX_EXAMPLES`] distinct non-missing values in first-seen order.
    pub examples: Vec<String>,
}

impl ColumnProfile {
    /// Profile a column from its values.
    pub fn from_values<'a>(data_type: DataType, values: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut seen = HashSet::new();
        let mut examples = Vec::new();
        let mut row_count = 0;
        let mut non_missing = 0;

        for value in values {
            row_count += 1;
            let Some(key) = value.key() else {
                continue;
            };
            non_missing += 1;
            if seen.insert(key) && examples.len() < MAX_EXAMPLES {
                examples.push(value.to_string());
            }
        }

        let distinct_non_missing = seen.len();
        let has_missing = non_missing < row_count;
        Self {
            data_type,
            row_count,
            non_missing,
            distinct_non_missing,
            distinct_with_missing: distinct_non_missing + usize::from(has_missing),
            examples,
        }
    }

    /// Percentage of non-missing values; `0.0` for an empty column.
    pub fn coverage_pct(&self) -> f64 {
        if self.row_count == 0 {
            0.0
        } else {
            self.non_missing as f64 / self.row_count as f64 * 100.0
        }
    }

    /// `distinct_with_missing / row_count`; `0.0` for an empty column.
    pub fn distinct_ratio(&self) -> f64 {
        if self.row_count == 0 {
            0.0
        } else {
            self.distinct_with_missing as f64 / self.row_count as f64
        }
    }
}
