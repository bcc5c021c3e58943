// src/schema/types.rs

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// BigQuery column types accepted in uploaded schema metadata.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy, Eq, Hash)]
pub enum ColumnType {
    String,
    Bytes,
    Integer,
    Int64,
    Float,
    Float64,
    Numeric,
    Boolean,
    Bool,
    Date,
    Time,
    Datetime,
    Timestamp,
}

impl FromStr for ColumnType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Case-sensitive on purpose: these are the literal BigQuery type names.
        let ty = match s {
            "STRING" => ColumnType::String,
            "BYTES" => ColumnType::Bytes,
            "INTEGER" => ColumnType::Integer,
            "INT64" => ColumnType::Int64,
            "FLOAT" => ColumnType::Float,
            "FLOAT64" => ColumnType::Float64,
            "NUMERIC" => ColumnType::Numeric,
            "BOOLEAN" => ColumnType::Boolean,
            "BOOL" => ColumnType::Bool,
            "DATE" => ColumnType::Date,
            "TIME" => ColumnType::Time,
            "DATETIME" => ColumnType::Datetime,
            "TIMESTAMP" => ColumnType::Timestamp,
            other => bail!("unknown column type `{}`", other),
        };
        Ok(ty)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnType::String => "STRING",
            ColumnType::Bytes => "BYTES",
            ColumnType::Integer => "INTEGER",
            ColumnType::Int64 => "INT64",
            ColumnType::Float => "FLOAT",
            ColumnType::Float64 => "FLOAT64",
            ColumnType::Numeric => "NUMERIC",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Bool => "BOOL",
            ColumnType::Date => "DATE",
            ColumnType::Time => "TIME",
            ColumnType::Datetime => "DATETIME",
            ColumnType::Timestamp => "TIMESTAMP",
        };
        f.write_str(s)
    }
}

/// A single column definition for a load job.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub ty: ColumnType,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}
