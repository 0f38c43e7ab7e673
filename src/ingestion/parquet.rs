//! Parquet loading implementation.

use std::path::Path;

use chrono::{DateTime, NaiveDate};
use parquet::basic::{ConvertedType, LogicalType, TimeUnit, Type as PhysicalType};
use parquet::file::reader::{ChunkReader, FileReader};
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field as ParquetField;
use parquet::schema::types::Type as SchemaType;

use crate::error::LoadResult;
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// How integer cells of a temporal column are counted from the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Epoch {
    Days,
    Millis,
    Micros,
    Nanos,
}

/// Declared type of one top-level column plus its temporal encoding, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnDecl {
    data_type: DataType,
    epoch: Option<Epoch>,
}

impl ColumnDecl {
    fn plain(data_type: DataType) -> Self {
        Self { data_type, epoch: None }
    }

    fn temporal(epoch: Epoch) -> Self {
        let data_type = if epoch == Epoch::Days {
            DataType::Date
        } else {
            DataType::DateTime
        };
        Self {
            data_type,
            epoch: Some(epoch),
        }
    }
}

/// Load a Parquet file into an in-memory `DataSet`.
///
/// Notes:
/// - Column names and types come from the file schema, so empty files still list their columns
/// - The logical type wins over the legacy converted type when both are present
/// - Uses the Parquet record API (`RowIter`); the whole file is read
/// - Nested columns are kept as their string rendering
pub fn load_parquet_from_path(path: impl AsRef<Path>) -> LoadResult<DataSet> {
    let reader = SerializedFileReader::try_from(path.as_ref())?;
    let decls = column_decls(&reader);
    let schema = Schema::new(
        decls
            .iter()
            .map(|(name, decl)| Field::new(name.as_str(), decl.data_type))
            .collect(),
    );

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for row_res in reader.into_iter() {
        let row = row_res?;
        let mut out_row = vec![Value::Null; decls.len()];
        for (name, field) in row.get_column_iter() {
            if let Some(idx) = schema.index_of(name) {
                out_row[idx] = convert_parquet_field(field, decls[idx].1.epoch);
            }
        }
        rows.push(out_row);
    }

    Ok(DataSet::new(schema, rows))
}

fn column_decls<R: ChunkReader + 'static>(reader: &SerializedFileReader<R>) -> Vec<(String, ColumnDecl)> {
    let root = reader.metadata().file_metadata().schema_descr().root_schema();
    root.get_fields()
        .iter()
        .map(|t| (t.name().to_string(), declared_type(t)))
        .collect()
}

fn declared_type(t: &SchemaType) -> ColumnDecl {
    if t.is_group() {
        return ColumnDecl::plain(DataType::Utf8);
    }
    let physical = t.get_physical_type();
    match t.get_basic_info().logical_type_ref() {
        Some(logical) => from_logical(physical, logical),
        None => from_converted(physical, t.get_basic_info().converted_type()),
    }
}

fn from_logical(physical: PhysicalType, logical: &LogicalType) -> ColumnDecl {
    match logical {
        LogicalType::Date => ColumnDecl::temporal(Epoch::Days),
        LogicalType::Timestamp { unit, .. } => ColumnDecl::temporal(match unit {
            TimeUnit::MILLIS => Epoch::Millis,
            TimeUnit::MICROS => Epoch::Micros,
            TimeUnit::NANOS => Epoch::Nanos,
        }),
        LogicalType::String | LogicalType::Enum | LogicalType::Json => ColumnDecl::plain(DataType::Utf8),
        LogicalType::Decimal { .. } => ColumnDecl::plain(DataType::Float64),
        LogicalType::Integer { .. } => ColumnDecl::plain(DataType::Int64),
        _ => from_converted(physical, ConvertedType::NONE),
    }
}

fn from_converted(physical: PhysicalType, converted: ConvertedType) -> ColumnDecl {
    match physical {
        PhysicalType::BOOLEAN => ColumnDecl::plain(DataType::Bool),
        PhysicalType::INT32 | PhysicalType::INT64 => match converted {
            ConvertedType::DATE => ColumnDecl::temporal(Epoch::Days),
            ConvertedType::TIMESTAMP_MILLIS => ColumnDecl::temporal(Epoch::Millis),
            ConvertedType::TIMESTAMP_MICROS => ColumnDecl::temporal(Epoch::Micros),
            ConvertedType::DECIMAL => ColumnDecl::plain(DataType::Float64),
            _ => ColumnDecl::plain(DataType::Int64),
        },
        PhysicalType::INT96 => ColumnDecl::plain(DataType::DateTime),
        PhysicalType::FLOAT | PhysicalType::DOUBLE => ColumnDecl::plain(DataType::Float64),
        PhysicalType::BYTE_ARRAY | PhysicalType::FIXED_LEN_BYTE_ARRAY => match converted {
            ConvertedType::UTF8 | ConvertedType::ENUM | ConvertedType::JSON => ColumnDecl::plain(DataType::Utf8),
            ConvertedType::DECIMAL => ColumnDecl::plain(DataType::Float64),
            _ => ColumnDecl::plain(DataType::Binary),
        },
    }
}

/// Convert one record field. Raw integers of a temporal column are decoded with `epoch`, since
/// the record API only recognizes the legacy converted timestamp annotations.
fn convert_parquet_field(f: &ParquetField, epoch: Option<Epoch>) -> Value {
    match (f, epoch) {
        (ParquetField::Int(days), Some(Epoch::Days)) => date_from_days(i64::from(*days)),
        (ParquetField::Long(v), Some(unit)) => datetime_from_epoch(*v, unit),
        (ParquetField::Null, _) => Value::Null,
        (ParquetField::Bool(b), _) => Value::Bool(*b),
        (ParquetField::Byte(v), _) => Value::Int64(i64::from(*v)),
        (ParquetField::Short(v), _) => Value::Int64(i64::from(*v)),
        (ParquetField::Int(v), _) => Value::Int64(i64::from(*v)),
        (ParquetField::Long(v), _) => Value::Int64(*v),
        (ParquetField::UByte(v), _) => Value::Int64(i64::from(*v)),
        (ParquetField::UShort(v), _) => Value::Int64(i64::from(*v)),
        (ParquetField::UInt(v), _) => Value::Int64(i64::from(*v)),
        (ParquetField::ULong(v), _) => match i64::try_from(*v) {
            Ok(v) => Value::Int64(v),
            Err(_) => Value::Float64(*v as f64),
        },
        (ParquetField::Float(v), _) => Value::Float64(f64::from(*v)),
        (ParquetField::Double(v), _) => Value::Float64(*v),
        (ParquetField::Str(s), _) => Value::Utf8(s.clone()),
        (ParquetField::Bytes(b), _) => Value::Binary(b.data().to_vec()),
        (ParquetField::Date(days), _) => date_from_days(i64::from(*days)),
        (ParquetField::TimestampMillis(ms), _) => datetime_from_epoch(*ms, Epoch::Millis),
        (ParquetField::TimestampMicros(us), _) => datetime_from_epoch(*us, Epoch::Micros),
        (decimal @ ParquetField::Decimal(_), _) => decimal
            .to_string()
            .parse::<f64>()
            .map_or_else(|_| Value::Utf8(decimal.to_string()), Value::Float64),
        (other, _) => Value::Utf8(other.to_string()),
    }
}

fn date_from_days(days: i64) -> Value {
    NaiveDate::from_ymd_opt(1970, 1, 1)
        .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(days)))
        .map_or(Value::Null, Value::Date)
}

fn datetime_from_epoch(value: i64, unit: Epoch) -> Value {
    let dt = match unit {
        Epoch::Days => return date_from_days(value),
        Epoch::Millis => DateTime::from_timestamp_millis(value),
        Epoch::Micros => DateTime::from_timestamp_micros(value),
        Epoch::Nanos => Some(DateTime::from_timestamp_nanos(value)),
    };
    dt.map_or(Value::Null, |dt| Value::DateTime(dt.naive_utc()))
}
