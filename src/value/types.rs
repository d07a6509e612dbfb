//! Conversions from Rust types into [`Value`]
//!
//! Every type that can be bound as a parameter implements `Into<Value>`:
//!
//! - Integer types: `i8`, `i16`, `i32`, `i64`, `u8`, `u16`, `u32`
//! - Floating point: `f32`, `f64`
//! - Boolean: `bool`
//! - String: `String`, `&str`
//! - Binary: `Vec<u8>`, `&[u8]`
//! - Dates: `chrono::NaiveDate`, `chrono::NaiveDateTime` (ISO text)
//! - JSON: `serde_json::Value` (serialized text)
//! - `Option<T>` for all above types (`None` becomes `Value::Null`)
//!
//! `u64` is deliberately missing: values above `i64::MAX` cannot be stored
//! in an SQLite integer.

use super::Value;
use chrono::{NaiveDate, NaiveDateTime};

/// Format used for `NaiveDateTime` text values
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format used for `NaiveDate` text values
pub const DATE_FORMAT: &str = "%Y-%m-%d";

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Text(value.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Blob(value.to_vec())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Text(value.format(DATETIME_FORMAT).to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Text(value.format(DATE_FORMAT).to_string())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            other => Value::Text(other.to_string()),
        }
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
