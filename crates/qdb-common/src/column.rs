//! Column types understood by the store.
//!
//! Every mapped field declares one of these types in its annotation. The type
//! fixes which runtime values are accepted, how they are rendered on the
//! ingestion line, and which keyword declares the column in DDL.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic column type of a mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// `true` or `false`.
    Boolean,
    /// 8-bit signed integer.
    Byte,
    /// 16-bit signed integer.
    Short,
    /// 16-bit unicode character.
    Char,
    /// 32-bit signed integer.
    Int,
    /// 32-bit IEEE 754 float.
    Float,
    /// Interned, indexable string.
    Symbol,
    /// Variable length string.
    String,
    /// JSON document, stored as base64 text.
    Json,
    /// 64-bit signed integer.
    Long,
    /// Signed offset in milliseconds from the Unix epoch.
    Date,
    /// Signed offset in microseconds from the Unix epoch.
    Timestamp,
    /// 64-bit IEEE 754 float.
    Double,
    /// Byte array, stored as base64 text.
    Binary,
    /// 256-bit unsigned integer. Declared by the store, not supported here.
    Long256,
    /// Geohash. Declared by the store, not supported here.
    Geohash,
}

impl ColumnType {
    /// All column types, in store documentation order.
    pub const ALL: [ColumnType; 16] = [
        ColumnType::Boolean,
        ColumnType::Byte,
        ColumnType::Short,
        ColumnType::Char,
        ColumnType::Int,
        ColumnType::Float,
        ColumnType::Symbol,
        ColumnType::String,
        ColumnType::Json,
        ColumnType::Long,
        ColumnType::Date,
        ColumnType::Timestamp,
        ColumnType::Double,
        ColumnType::Binary,
        ColumnType::Long256,
        ColumnType::Geohash,
    ];

    /// The type name as written in annotations.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Boolean => "boolean",
            ColumnType::Byte => "byte",
            ColumnType::Short => "short",
            ColumnType::Char => "char",
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::Symbol => "symbol",
            ColumnType::String => "string",
            ColumnType::Json => "json",
            ColumnType::Long => "long",
            ColumnType::Date => "date",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Double => "double",
            ColumnType::Binary => "binary",
            ColumnType::Long256 => "long256",
            ColumnType::Geohash => "geohash",
        }
    }

    /// Look up a column type by its annotation name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == name)
    }

    /// Whether the mapper can encode values of this type.
    pub fn is_supported(&self) -> bool {
        !matches!(self, ColumnType::Long256 | ColumnType::Geohash)
    }

    /// Keyword used when declaring the column in a create-table statement.
    ///
    /// Binary and json values travel as base64 text, so they are declared as
    /// strings.
    pub fn ddl_type(&self) -> ColumnType {
        match self {
            ColumnType::Binary | ColumnType::Json => ColumnType::String,
            other => *other,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
