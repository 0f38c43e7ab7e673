//! Column role inference.
//!
//! [`infer_role`] runs an ordered chain of guard checks over a column's name, type and profile.
//! The first check that matches decides the [`Role`]; some checks also attach [`ColumnNote`]s.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::profile::ColumnProfile;
use crate::types::DataType;

/// Distinct-with-missing / rows above which a string column is flagged.
pub const HIGH_CARDINALITY_RATIO: f64 = 0.9;

/// Semantic role suggested for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Id,
    Target,
    Datetime,
    Numeric,
    Binary,
    Categorical,
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Target => "target",
            Self::Datetime => "datetime",
            Self::Numeric => "numeric",
            Self::Binary => "binary",
            Self::Categorical => "categorical",
            Self::Unknown => "unknown",
        }
    }

    /// Roles that can be used as model features.
    pub fn is_feature_like(&self) -> bool {
        matches!(self, Self::Numeric | Self::Categorical | Self::Binary)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advisory note attached to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnNote {
    PossibleIdentifier,
    ConstantColumn,
    Binary,
    CheckPercentageScale,
    HighCardinality,
}

impl ColumnNote {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PossibleIdentifier => "possible identifier",
            Self::ConstantColumn => "constant column",
            Self::Binary => "binary",
            Self::CheckPercentageScale => "check percentage scale",
            Self::HighCardinality => "high cardinality",
        }
    }
}

impl fmt::Display for ColumnNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ColumnNote {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Outcome of [`infer_role`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleInference {
    pub role: Role,
    pub notes: Vec<ColumnNote>,
}

impl RoleInference {
    fn bare(role: Role) -> Self {
        Self {
            role,
            notes: Vec::new(),
        }
    }
}

/// Classify one column.
///
/// Checks run in this order and the first match wins:
///
/// 1. name equals `target` exactly → [`Role::Target`]
/// 2. name contains `id`/`uuid` or ends with `_cd` (case-insensitive) → [`Role::Id`]
/// 3. date/datetime type → [`Role::Datetime`]
/// 4. numeric type → [`Role::Numeric`], noting constant/two-valued/percentage-like columns
/// 5. bool type → [`Role::Binary`]
/// 6. string type → [`Role::Categorical`], noting high cardinality
/// 7. anything else → [`Role::Unknown`]
pub fn infer_role(name: &str, profile: &ColumnProfile, target: Option<&str>) -> RoleInference {
    if target == Some(name) {
        return RoleInference::bare(Role::Target);
    }

    let lowered = name.to_lowercase();
    if lowered.contains("id") || lowered.contains("uuid") || lowered.ends_with("_cd") {
        return RoleInference {
            role: Role::Id,
            notes: vec![ColumnNote::PossibleIdentifier],
        };
    }

    match profile.data_type {
        t if t.is_temporal() => RoleInference::bare(Role::Datetime),
        t if t.is_numeric() => {
            let mut notes = Vec::new();
            match profile.distinct_non_missing {
                0 | 1 => notes.push(ColumnNote::ConstantColumn),
                2 => notes.push(ColumnNote::Binary),
                _ => {}
            }
            if lowered.contains("percent") || lowered.contains("rate") {
                notes.push(ColumnNote::CheckPercentageScale);
            }
            RoleInference {
                role: Role::Numeric,
                notes,
            }
        }
        DataType::Bool => RoleInference::bare(Role::Binary),
        DataType::Utf8 => {
            let mut notes = Vec::new();
            if profile.distinct_ratio() > HIGH_CARDINALITY_RATIO {
                notes.push(ColumnNote::HighCardinality);
            }
            RoleInference {
                role: Role::Categorical,
                notes,
            }
        }
        _ => RoleInference::bare(Role::Unknown),
    }
}
