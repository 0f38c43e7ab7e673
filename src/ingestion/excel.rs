#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{LoadError, LoadResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Load one sheet of an Excel workbook (`.xlsx`, `.xls`) into an in-memory `DataSet`.
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Reads at most `sample_rows` rows after the header when set
/// - Infers one type per column from the cell types it holds
pub fn load_excel_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
    sample_rows: Option<usize>,
) -> LoadResult<DataSet> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| LoadError::Malformed {
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook.worksheet_range(&sheet)?;
    load_sheet_range(&range, sample_rows).map_err(|e| wrap_err_with_sheet(&sheet, e))
}

fn load_sheet_range(range: &Range<Data>, sample_rows: Option<usize>) -> LoadResult<DataSet> {
    let (header_row_idx, header_cells) = find_header(range)?;
    let limit = sample_rows.unwrap_or(usize::MAX);

    let body: Vec<&[Data]> = range.rows().skip(header_row_idx + 1).take(limit).collect();

    let mut fields = Vec::with_capacity(header_cells.len());
    let mut columns: Vec<Vec<Value>> = Vec::with_capacity(header_cells.len());
    for (col_idx, name) in header_cells.into_iter().enumerate() {
        let cells: Vec<&Data> = body
            .iter()
            .map(|row| row.get(col_idx).unwrap_or(&Data::Empty))
            .collect();
        let data_type = infer_cell_type(&cells);
        columns.push(cells.iter().map(|c| convert_cell(data_type, c)).collect());
        fields.push(Field::new(name, data_type));
    }

    let rows = (0..body.len())
        .map(|row_idx| columns.iter().map(|col| col[row_idx].clone()).collect())
        .collect();

    Ok(DataSet::new(Schema::new(fields), rows))
}

fn wrap_err_with_sheet(sheet: &str, err: LoadError) -> LoadError {
    match err {
        LoadError::Malformed { message } => LoadError::Malformed {
            message: format!("sheet '{sheet}': {message}"),
        },
        other => other,
    }
}

fn find_header(range: &Range<Data>) -> LoadResult<(usize, Vec<String>)> {
    range
        .rows()
        .enumerate()
        .find(|(_, row)| row.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|(idx0, row)| {
            let names = row
                .iter()
                .enumerate()
                .map(|(i, c)| match cell_to_header_string(c) {
                    name if name.trim().is_empty() => format!("column_{}", i + 1),
                    name => name.trim().to_string(),
                })
                .collect();
            (idx0, names)
        })
        .ok_or_else(|| LoadError::Malformed {
            message: "sheet has no non-empty rows (no header row found)".to_string(),
        })
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Pick one type for a column from the cells it holds; mixed content becomes a string column.
///
/// A column with rows but only empty cells is `float64`, the type of an all-NaN column.
fn infer_cell_type(cells: &[&Data]) -> DataType {
    let mut inferred: Option<DataType> = None;
    for cell in cells {
        let cell_type = match cell {
            Data::Empty => continue,
            Data::Int(_) => DataType::Int64,
            Data::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => DataType::Int64,
            Data::Float(_) => DataType::Float64,
            Data::Bool(_) => DataType::Bool,
            Data::DateTime(_) => DataType::DateTime,
            Data::DateTimeIso(s) if parse_iso_datetime(s).is_some() => DataType::DateTime,
            _ => DataType::Utf8,
        };
        inferred = Some(match (inferred, cell_type) {
            (None, t) => t,
            (Some(a), b) if a == b => a,
            (Some(DataType::Int64), DataType::Float64) | (Some(DataType::Float64), DataType::Int64) => {
                DataType::Float64
            }
            _ => return DataType::Utf8,
        });
    }
    match inferred {
        Some(t) => t,
        None if cells.is_empty() => DataType::Null,
        None => DataType::Float64,
    }
}

fn convert_cell(data_type: DataType, c: &Data) -> Value {
    match (data_type, c) {
        (_, Data::Empty) => Value::Null,
        (DataType::Int64, Data::Int(i)) => Value::Int64(*i),
        (DataType::Int64, Data::Float(f)) => Value::Int64(*f as i64),
        (DataType::Float64, Data::Int(i)) => Value::Float64(*i as f64),
        (DataType::Float64, Data::Float(f)) => Value::Float64(*f),
        (DataType::Bool, Data::Bool(b)) => Value::Bool(*b),
        (DataType::DateTime, Data::DateTime(dt)) => {
            excel_serial_to_datetime(dt.as_f64()).map_or(Value::Null, Value::DateTime)
        }
        (DataType::DateTime, Data::DateTimeIso(s)) => {
            parse_iso_datetime(s).map_or(Value::Null, Value::DateTime)
        }
        (_, Data::String(s)) => Value::Utf8(s.clone()),
        (_, other) => Value::Utf8(other.to_string()),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Convert an Excel serial date (days since 1899-12-30, 1900 date system) to a timestamp.
fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    base.checked_add_signed(chrono::Duration::milliseconds(millis))
}
