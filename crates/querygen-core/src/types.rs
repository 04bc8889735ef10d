//! Module: types
//! Responsibility: map raw catalog column types onto generated Rust types.
//!
//! Invariants:
//! - Every recognized `DbType` has exactly one mapping arm.
//! - Unrecognized data types are a generation-time error, never a guess.


use derive_more::Display;
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error as ThisError;

static BIT_SIZE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"bit\((\d+)\)").expect("bit size regex is valid"));

///
/// TypeError
///

#[derive(Debug, ThisError)]
pub enum TypeError {
    #[error("unhandled DB type: {data_type} ({column_type})")]
    Unmapped {
        data_type: String,
        column_type: String,
    },
}

///
/// DbType
/// Catalog `DATA_TYPE` keywords recognized by the mapper.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[remain::sorted]
pub enum DbType {
    BigInt,
    Binary,
    Bit,
    Blob,
    Bool,
    Char,
    Date,
    DateTime,
    Decimal,
    Double,
    Enum,
    Float,
    Int,
    LongBlob,
    LongText,
    MediumBlob,
    MediumInt,
    MediumText,
    Set,
    SmallInt,
    Text,
    Time,
    Timestamp,
    TinyBlob,
    TinyInt,
    TinyText,
    Uuid,
    VarBinary,
    VarChar,
    Year,
}

impl DbType {
    /// Resolve a raw `DATA_TYPE` keyword (case-insensitive) to a known type.
    #[must_use]
    pub fn parse(data_type: &str) -> Option<Self> {
        let ty = match data_type.trim().to_ascii_lowercase().as_str() {
            "tinyint" => Self::TinyInt,
            "smallint" => Self::SmallInt,
            "mediumint" => Self::MediumInt,
            "int" | "integer" => Self::Int,
            "bigint" => Self::BigInt,
            "float" => Self::Float,
            "double" | "real" => Self::Double,
            "decimal" | "dec" | "numeric" | "fixed" => Self::Decimal,
            "bit" => Self::Bit,
            "bool" | "boolean" => Self::Bool,
            "char" => Self::Char,
            "binary" => Self::Binary,
            "varbinary" => Self::VarBinary,
            "blob" => Self::Blob,
            "tinyblob" => Self::TinyBlob,
            "mediumblob" => Self::MediumBlob,
            "longblob" => Self::LongBlob,
            "varchar" => Self::VarChar,
            "text" => Self::Text,
            "tinytext" => Self::TinyText,
            "mediumtext" => Self::MediumText,
            "longtext" => Self::LongText,
            "enum" => Self::Enum,
            "set" => Self::Set,
            "date" => Self::Date,
            "time" => Self::Time,
            "year" => Self::Year,
            "datetime" => Self::DateTime,
            "timestamp" => Self::Timestamp,
            "uuid" => Self::Uuid,
            _ => return None,
        };

        Some(ty)
    }
}

///
/// TargetType
/// Rust types a generated field can take.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[remain::sorted]
pub enum TargetType {
    #[display("bool")]
    Bool,
    #[display("Vec<u8>")]
    Bytes,
    #[display("DateTime")]
    DateTime,
    #[display("Decimal")]
    Decimal,
    #[display("f64")]
    Float64,
    #[display("i32")]
    Int32,
    #[display("i64")]
    Int64,
    #[display("String")]
    String,
    #[display("u32")]
    UInt32,
    #[display("u64")]
    UInt64,
    #[display("Uuid")]
    Uuid,
}

impl ToTokens for TargetType {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.extend(match self {
            Self::Bool => quote!(bool),
            Self::Bytes => quote!(::std::vec::Vec<u8>),
            Self::DateTime => quote!(::querygen_runtime::types::DateTime),
            Self::Decimal => quote!(::querygen_runtime::types::Decimal),
            Self::Float64 => quote!(f64),
            Self::Int32 => quote!(i32),
            Self::Int64 => quote!(i64),
            Self::String => quote!(::std::string::String),
            Self::UInt32 => quote!(u32),
            Self::UInt64 => quote!(u64),
            Self::Uuid => quote!(::querygen_runtime::types::Uuid),
        });
    }
}

/// Map a catalog `(DATA_TYPE, COLUMN_TYPE)` pair to the generated Rust type.
pub fn map_type(data_type: &str, column_type: &str) -> Result<TargetType, TypeError> {
    let Some(db_type) = DbType::parse(data_type) else {
        return Err(TypeError::Unmapped {
            data_type: data_type.to_string(),
            column_type: column_type.to_string(),
        });
    };

    let column_type = column_type.trim().to_ascii_lowercase();
    let unsigned = column_type.contains("unsigned");

    let target = match db_type {
        DbType::TinyInt | DbType::SmallInt | DbType::MediumInt | DbType::Int => {
            if unsigned {
                TargetType::UInt32
            } else {
                TargetType::Int32
            }
        }
        DbType::BigInt => {
            if unsigned {
                TargetType::UInt64
            } else {
                TargetType::Int64
            }
        }
        DbType::Float | DbType::Double => TargetType::Float64,
        DbType::Decimal => TargetType::Decimal,
        DbType::Bit => bit_type(&column_type),
        DbType::Bool => TargetType::Bool,
        DbType::Char => {
            if column_type == "char(36)" {
                TargetType::Uuid
            } else {
                TargetType::String
            }
        }
        DbType::Binary
        | DbType::VarBinary
        | DbType::Blob
        | DbType::TinyBlob
        | DbType::MediumBlob
        | DbType::LongBlob => TargetType::Bytes,
        DbType::VarChar
        | DbType::Text
        | DbType::TinyText
        | DbType::MediumText
        | DbType::LongText
        | DbType::Enum
        | DbType::Set => TargetType::String,
        DbType::Date | DbType::Time | DbType::Year | DbType::DateTime | DbType::Timestamp => {
            TargetType::DateTime
        }
        DbType::Uuid => TargetType::Uuid,
    };

    Ok(target)
}

// bit_type
// bit(1) is a flag, up to 64 bits fits an integer, wider is raw bytes
fn bit_type(column_type: &str) -> TargetType {
    let size = BIT_SIZE_REGEX
        .captures(column_type)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok());

    match size {
        Some(1) => TargetType::Bool,
        Some(n) if n > 64 => TargetType::Bytes,
        _ => TargetType::UInt64,
    }
}
