//! Feather (Arrow IPC file) loading via polars.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::{self as pl, IpcReader, SerReader, TimeUnit};

use crate::error::LoadResult;
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Load a Feather file into an in-memory `DataSet`.
///
/// The whole file is read; polars dtypes are mapped onto [`DataType`] and anything without a
/// direct counterpart (lists, structs, durations, ...) is kept as its string rendering.
pub fn load_feather_from_path(path: impl AsRef<Path>) -> LoadResult<DataSet> {
    let file = File::open(path)?;
    let df = IpcReader::new(file).finish()?;

    let mut fields = Vec::with_capacity(df.width());
    let mut rows: Vec<Vec<Value>> = (0..df.height())
        .map(|_| Vec::with_capacity(df.width()))
        .collect();

    for column in df.columns() {
        let (data_type, values) = convert_series(column.as_materialized_series())?;
        fields.push(Field::new(column.name().as_str(), data_type));
        for (row, value) in rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    Ok(DataSet::new(Schema::new(fields), rows))
}

fn convert_series(s: &pl::Series) -> LoadResult<(DataType, Vec<Value>)> {
    let converted = match s.dtype() {
        pl::DataType::Null => (DataType::Null, vec![Value::Null; s.len()]),
        pl::DataType::Boolean => (
            DataType::Bool,
            s.bool()?.into_iter().map(|v| v.map_or(Value::Null, Value::Bool)).collect(),
        ),
        dt if dt.is_integer() => {
            let cast = s.cast(&pl::DataType::Int64)?;
            let values = cast.i64()?.into_iter().map(|v| v.map_or(Value::Null, Value::Int64)).collect();
            (DataType::Int64, values)
        }
        dt if dt.is_float() => {
            let cast = s.cast(&pl::DataType::Float64)?;
            let values = cast.f64()?.into_iter().map(|v| v.map_or(Value::Null, Value::Float64)).collect();
            (DataType::Float64, values)
        }
        pl::DataType::String => (DataType::Utf8, string_values(s.str()?)),
        pl::DataType::Binary => (
            DataType::Binary,
            s.binary()?
                .into_iter()
                .map(|v| v.map_or(Value::Null, |b| Value::Binary(b.to_vec())))
                .collect(),
        ),
        pl::DataType::Date => {
            let cast = s.cast(&pl::DataType::Int32)?;
            let values = cast
                .i32()?
                .into_iter()
                .map(|v| v.and_then(date_from_days).map_or(Value::Null, Value::Date))
                .collect();
            (DataType::Date, values)
        }
        pl::DataType::Datetime(unit, _) => {
            let unit = *unit;
            let cast = s.cast(&pl::DataType::Int64)?;
            let values = cast
                .i64()?
                .into_iter()
                .map(|v| v.and_then(|v| datetime_from_epoch(v, unit)).map_or(Value::Null, Value::DateTime))
                .collect();
            (DataType::DateTime, values)
        }
        _ => (DataType::Utf8, stringified_values(s)?),
    };
    Ok(converted)
}

fn string_values(ca: &pl::StringChunked) -> Vec<Value> {
    ca.into_iter()
        .map(|v| v.map_or(Value::Null, |s| Value::Utf8(s.to_owned())))
        .collect()
}

fn stringified_values(s: &pl::Series) -> LoadResult<Vec<Value>> {
    if let Ok(cast) = s.cast(&pl::DataType::String) {
        return Ok(string_values(cast.str()?));
    }
    let mut values = Vec::with_capacity(s.len());
    for idx in 0..s.len() {
        let av = s.get(idx)?;
        values.push(if av.is_null() {
            Value::Null
        } else {
            Value::Utf8(av.to_string())
        });
    }
    Ok(values)
}

fn date_from_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(chrono::Duration::days(i64::from(days)))
}

fn datetime_from_epoch(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let per_second: i64 = match unit {
        TimeUnit::Nanoseconds => 1_000_000_000,
        TimeUnit::Microseconds => 1_000_000,
        TimeUnit::Milliseconds => 1_000,
    };
    let secs = value.div_euclid(per_second);
    let sub = value.rem_euclid(per_second);
    let nanos = u32::try_from(sub * (1_000_000_000 / per_second)).ok()?;
    DateTime::from_timestamp(secs, nanos).map(|dt| dt.naive_utc())
}
