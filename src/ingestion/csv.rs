//! CSV loading with per-column type inference.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{LoadError, LoadResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Cell contents (after trimming) that count as missing.
const MISSING_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Load a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers.
/// - At most `sample_rows` data rows are read when set.
/// - Each column gets the narrowest type that parses all of its non-missing values.
pub fn load_csv_from_path(path: impl AsRef<Path>, sample_rows: Option<usize>) -> LoadResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    load_csv_from_reader(&mut rdr, sample_rows)
}

/// Load CSV data from an existing CSV reader.
pub fn load_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    sample_rows: Option<usize>,
) -> LoadResult<DataSet> {
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_owned()).collect();
    if headers.is_empty() {
        return Err(LoadError::Malformed {
            message: "csv has no header row".to_string(),
        });
    }

    // Column-major raw cells; `None` marks a missing token.
    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    let limit = sample_rows.unwrap_or(usize::MAX);
    for result in rdr.records().take(limit) {
        let record = result?;
        for (idx, column) in raw.iter_mut().enumerate() {
            let cell = record.get(idx).unwrap_or("").trim();
            column.push(if is_missing_token(cell) {
                None
            } else {
                Some(cell.to_owned())
            });
        }
    }

    let fields: Vec<Field> = headers
        .iter()
        .zip(raw.iter())
        .map(|(name, cells)| Field::new(name.clone(), infer_column_type(cells)))
        .collect();

    let row_count = raw.first().map_or(0, Vec::len);
    let mut rows: Vec<Vec<Value>> = (0..row_count)
        .map(|_| Vec::with_capacity(fields.len()))
        .collect();
    for (field, cells) in fields.iter().zip(raw) {
        for (row, cell) in rows.iter_mut().zip(cells) {
            row.push(match cell {
                Some(text) => parse_typed_value(field.data_type, text),
                None => Value::Null,
            });
        }
    }

    Ok(DataSet::new(Schema::new(fields), rows))
}

fn is_missing_token(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell)
}

/// Pick the narrowest type that parses every non-missing cell.
///
/// A column with rows but no values is `float64`, the type of an all-NaN column.
fn infer_column_type(cells: &[Option<String>]) -> DataType {
    if cells.is_empty() {
        return DataType::Null;
    }
    let mut present = cells.iter().flatten().map(String::as_str).peekable();
    if present.peek().is_none() {
        return DataType::Float64;
    }
    let values: Vec<&str> = present.collect();

    if values.iter().all(|v| v.parse::<i64>().is_ok()) {
        return DataType::Int64;
    }
    if values.iter().all(|v| v.parse::<f64>().is_ok()) {
        return DataType::Float64;
    }
    if values.iter().all(|v| parse_bool(v).is_some()) {
        return DataType::Bool;
    }
    if values.iter().all(|v| parse_date(v).is_some()) {
        return DataType::Date;
    }
    if values
        .iter()
        .all(|v| parse_datetime(v).is_some() || parse_date(v).is_some())
    {
        return DataType::DateTime;
    }
    DataType::Utf8
}

fn parse_typed_value(data_type: DataType, raw: String) -> Value {
    let parsed = match data_type {
        DataType::Int64 => raw.parse::<i64>().ok().map(Value::Int64),
        DataType::Float64 => raw.parse::<f64>().ok().map(Value::Float64),
        DataType::Bool => parse_bool(&raw).map(Value::Bool),
        DataType::Date => parse_date(&raw).map(Value::Date),
        DataType::DateTime => parse_datetime(&raw)
            .or_else(|| parse_date(&raw).and_then(|d| d.and_hms_opt(0, 0, 0)))
            .map(Value::DateTime),
        DataType::Utf8 | DataType::Binary | DataType::Null => None,
    };
    // The inferred type parses every cell, so the fallback only keeps the raw text around.
    parsed.unwrap_or(Value::Utf8(raw))
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
}
