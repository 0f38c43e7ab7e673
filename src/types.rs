//! Core data model types for loaded tables.
//!
//! Every loader produces an in-memory [`DataSet`]: an inferred [`Schema`] (a list of typed
//! [`Field`]s) plus row-major [`Value`] storage.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Serialize, Serializer};

/// Logical data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
    /// Calendar date without time.
    Date,
    /// Date and time without timezone.
    DateTime,
    /// Opaque bytes.
    Binary,
    /// No value was ever observed and the source declared no type.
    Null,
}

impl DataType {
    /// Lowercase name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::Utf8 => "string",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Binary => "binary",
            Self::Null => "null",
        }
    }

    /// `true` for integer and floating point types.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }

    /// `true` for date and datetime types.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::DateTime)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing the shape of a loaded table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Timezone-naive timestamp.
    DateTime(NaiveDateTime),
    /// Raw bytes.
    Binary(Vec<u8>),
}

impl Value {
    /// A value is missing when it is [`Value::Null`] or a floating point NaN.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Float64(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Hashable identity used for distinct counting; `None` for missing values.
    pub fn key(&self) -> Option<ValueKey<'_>> {
        Some(match self {
            Self::Null => return None,
            Self::Float64(v) if v.is_nan() => return None,
            Self::Int64(v) => ValueKey::Int64(*v),
            // -0.0 and 0.0 are the same observation.
            Self::Float64(v) => ValueKey::Float64(if *v == 0.0 { 0 } else { v.to_bits() }),
            Self::Bool(v) => ValueKey::Bool(*v),
            Self::Utf8(v) => ValueKey::Utf8(v.as_str()),
            Self::Date(v) => ValueKey::Date(*v),
            Self::DateTime(v) => ValueKey::DateTime(*v),
            Self::Binary(v) => ValueKey::Binary(v.as_slice()),
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float64(v) => {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
                    write!(f, "{v:.1}")
                } else {
                    write!(f, "{v}")
                }
            }
            Self::Bool(v) => write!(f, "{v}"),
            Self::Utf8(v) => f.write_str(v),
            Self::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Self::DateTime(v) => {
                if v.nanosecond() == 0 {
                    write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S"))
                } else {
                    write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S%.f"))
                }
            }
            Self::Binary(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

/// Borrowed, hashable form of a non-missing [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKey<'a> {
    Int64(i64),
    Float64(u64),
    Bool(bool),
    Utf8(&'a str),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Binary(&'a [u8]),
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Iterate the values of the column at `idx`, top to bottom.
    ///
    /// Short rows yield [`Value::Null`] for the missing cells.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Value> {
        self.rows
            .iter()
            .map(move |row| row.get(idx).unwrap_or(&Value::Null))
    }
}
