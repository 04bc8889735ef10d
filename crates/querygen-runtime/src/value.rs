//! Module: value
//! Responsibility: the dynamic value exchanged with drivers, and conversion
//! into the concrete field types of generated structs.
//!
//! Invariants:
//! - SQL NULL decodes to the target type's zero value, never an error.
//! - Text is accepted for every target (drivers in text protocol mode).
//! - Narrowing integer conversions fail instead of truncating.


use crate::{
    Error,
    types::{DateTime, Decimal, Uuid},
};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

///
/// Value
///

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Decimal(Decimal),
    Uuid(Uuid),
    DateTime(DateTime),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Decimal(_) => "decimal",
            Self::Uuid(_) => "uuid",
            Self::DateTime(_) => "datetime",
        }
    }

    /// Textual rendering used for string-typed result fields.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => String::from(if b { "1" } else { "0" }),
            Self::Int(v) => v.to_string(),
            Self::UInt(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Text(s) => s,
            Self::Bytes(b) => String::from_utf8_lossy(&b).into_owned(),
            Self::Decimal(d) => d.to_string(),
            Self::Uuid(u) => u.hyphenated().to_string(),
            Self::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident $(as $cast:ty)?),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v $(as $cast)?)
                }
            }
        )*
    };
}

impl_from_for_value! {
    bool => Bool,
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int,
    u8 => UInt as u64,
    u16 => UInt as u64,
    u32 => UInt as u64,
    u64 => UInt,
    f32 => Float as f64,
    f64 => Float,
    String => Text,
    Vec<u8> => Bytes,
    Decimal => Decimal,
    Uuid => Uuid,
    DateTime => DateTime,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

///
/// FromValue
///

pub trait FromValue: Sized {
    /// Name of the target type in decode errors.
    const EXPECTED: &'static str;

    fn from_value(value: Value, column: &str) -> Result<Self, Error>;
}

// mismatch
fn mismatch<T: FromValue>(column: &str, value: &Value) -> Error {
    Error::decode(column, T::EXPECTED, value.kind())
}

fn parse_text<T: FromValue + FromStr>(column: &str, s: &str) -> Result<T, Error> {
    s.trim()
        .parse()
        .map_err(|_| Error::decode(column, T::EXPECTED, format!("text '{s}'")))
}

// fold_be
// BIT(n) columns arrive as big-endian bytes
fn fold_be(bytes: &[u8]) -> Option<u64> {
    if bytes.len() > 8 {
        return None;
    }

    Some(bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
}

macro_rules! impl_from_value_int {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl FromValue for $ty {
                const EXPECTED: &'static str = $name;

                fn from_value(value: Value, column: &str) -> Result<Self, Error> {
                    let out_of_range = |v: String| {
                        Error::decode(column, Self::EXPECTED, format!("out of range value {v}"))
                    };

                    match value {
                        Value::Null => Ok(Self::default()),
                        Value::Bool(b) => Ok(Self::from(b)),
                        Value::Int(v) => Self::try_from(v).map_err(|_| out_of_range(v.to_string())),
                        Value::UInt(v) => Self::try_from(v).map_err(|_| out_of_range(v.to_string())),
                        Value::Text(ref s) => parse_text(column, s),
                        Value::Bytes(ref b) => fold_be(b)
                            .ok_or_else(|| mismatch::<Self>(column, &value))
                            .and_then(|v| Self::try_from(v).map_err(|_| out_of_range(v.to_string()))),
                        other => Err(mismatch::<Self>(column, &other)),
                    }
                }
            }
        )*
    };
}

impl_from_value_int! {
    i32 => "i32",
    i64 => "i64",
    u32 => "u32",
    u64 => "u64",
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: Value, column: &str) -> Result<Self, Error> {
        match value {
            Value::Null => Ok(false),
            Value::Bool(b) => Ok(b),
            Value::Int(v) => Ok(v != 0),
            Value::UInt(v) => Ok(v != 0),
            Value::Bytes(ref b) => Ok(b.iter().any(|byte| *byte != 0)),
            Value::Text(ref s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => Ok(true),
                "0" | "false" | "" => Ok(false),
                _ => Err(Error::decode(column, Self::EXPECTED, format!("text '{s}'"))),
            },
            other => Err(mismatch::<Self>(column, &other)),
        }
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "f64";

    #[allow(clippy::cast_precision_loss)]
    fn from_value(value: Value, column: &str) -> Result<Self, Error> {
        match value {
            Value::Null => Ok(0.0),
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as Self),
            Value::UInt(v) => Ok(v as Self),
            Value::Decimal(d) => d
                .to_f64()
                .ok_or_else(|| Error::decode(column, Self::EXPECTED, d.to_string())),
            Value::Text(ref s) => parse_text(column, s),
            other => Err(mismatch::<Self>(column, &other)),
        }
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: Value, _column: &str) -> Result<Self, Error> {
        Ok(value.into_text())
    }
}

impl FromValue for Vec<u8> {
    const EXPECTED: &'static str = "bytes";

    fn from_value(value: Value, column: &str) -> Result<Self, Error> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Bytes(b) => Ok(b),
            Value::Text(s) => Ok(s.into_bytes()),
            other => Err(mismatch::<Self>(column, &other)),
        }
    }
}

impl FromValue for Decimal {
    const EXPECTED: &'static str = "decimal";

    fn from_value(value: Value, column: &str) -> Result<Self, Error> {
        match value {
            Value::Null => Ok(Self::ZERO),
            Value::Decimal(d) => Ok(d),
            Value::Int(v) => Ok(Self::from(v)),
            Value::UInt(v) => Ok(Self::from(v)),
            Value::Float(v) => {
                Self::try_from(v).map_err(|_| Error::decode(column, Self::EXPECTED, v.to_string()))
            }
            Value::Text(ref s) => parse_text(column, s),
            other => Err(mismatch::<Self>(column, &other)),
        }
    }
}

impl FromValue for Uuid {
    const EXPECTED: &'static str = "uuid";

    fn from_value(value: Value, column: &str) -> Result<Self, Error> {
        match value {
            Value::Null => Ok(Self::nil()),
            Value::Uuid(u) => Ok(u),
            Value::Text(ref s) => parse_text(column, s),
            Value::Bytes(ref b) => Self::from_slice(b).map_err(|_| mismatch::<Self>(column, &value)),
            other => Err(mismatch::<Self>(column, &other)),
        }
    }
}

impl FromValue for DateTime {
    const EXPECTED: &'static str = "datetime";

    fn from_value(value: Value, column: &str) -> Result<Self, Error> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::DateTime(dt) => Ok(dt),
            Value::Text(ref s) => parse_datetime(s.trim())
                .ok_or_else(|| Error::decode(column, Self::EXPECTED, format!("text '{s}'"))),
            other => Err(mismatch::<Self>(column, &other)),
        }
    }
}

// parse_datetime
// DATE and TIME columns share the datetime target; the missing half is zeroed
fn parse_datetime(s: &str) -> Option<DateTime> {
    for format in DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    if let Ok(time) = NaiveTime::parse_from_str(s, "%H:%M:%S%.f") {
        return Some(DateTime::default().date().and_time(time));
    }
    if let Ok(year) = s.parse::<i32>() {
        return NaiveDate::from_ymd_opt(year, 1, 1).map(|d| d.and_time(NaiveTime::MIN));
    }

    None
}
