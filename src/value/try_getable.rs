//! TryGetable trait for safe value extraction
//!
//! The inverse of the `From<T> for Value` conversions: extracts a Rust type
//! from a [`Value`] with a typed error when the value does not fit.

use super::types::{DATETIME_FORMAT, DATE_FORMAT};
use super::Value;
use chrono::{NaiveDate, NaiveDateTime};

/// Error type for value extraction failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueExtractionError {
    /// The value is null but the target type is not optional
    NullValue,
    /// The value type doesn't match the expected type
    TypeMismatch { expected: String, actual: String },
    /// Value conversion failed (e.g., overflow, invalid format)
    ConversionError(String),
}

impl std::fmt::Display for ValueExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueExtractionError::NullValue => write!(f, "Value is null"),
            ValueExtractionError::TypeMismatch { expected, actual } => {
                write!(f, "Type mismatch: expected {}, got {}", expected, actual)
            }
            ValueExtractionError::ConversionError(msg) => {
                write!(f, "Conversion error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ValueExtractionError {}

fn mismatch(expected: &str, actual: &Value) -> ValueExtractionError {
    if actual.is_null() {
        return ValueExtractionError::NullValue;
    }
    ValueExtractionError::TypeMismatch {
        expected: expected.to_string(),
        actual: actual.kind().to_string(),
    }
}

/// Trait for safe value extraction with error handling
///
/// ## Usage
///
/// ```rust
/// use sqlwright::{TryGetable, Value, ValueExtractionError};
///
/// let result: Result<i32, ValueExtractionError> = TryGetable::try_get(Value::Int(42));
/// assert_eq!(result, Ok(42));
///
/// let result: Result<i32, ValueExtractionError> = TryGetable::try_get(Value::Null);
/// assert_eq!(result, Err(ValueExtractionError::NullValue));
///
/// let result: Result<Option<i32>, ValueExtractionError> = TryGetable::try_get(Value::Null);
/// assert_eq!(result, Ok(None));
/// ```
pub trait TryGetable: Sized {
    /// Try to extract a value, returning an error if extraction fails.
    fn try_get(value: Value) -> Result<Self, ValueExtractionError>;
}

impl TryGetable for Value {
    fn try_get(value: Value) -> Result<Self, ValueExtractionError> {
        Ok(value)
    }
}

impl TryGetable for i64 {
    fn try_get(value: Value) -> Result<Self, ValueExtractionError> {
        match value {
            Value::Int(i) => Ok(i),
            Value::Bool(b) => Ok(i64::from(b)),
            other => Err(mismatch("integer", &other)),
        }
    }
}

macro_rules! impl_try_get_narrow_int {
    ($($t:ty),*) => {
        $(
            impl TryGetable for $t {
                fn try_get(value: Value) -> Result<Self, ValueExtractionError> {
                    let wide = i64::try_get(value)?;
                    <$t>::try_from(wide).map_err(|_| {
                        ValueExtractionError::ConversionError(format!(
                            "{} does not fit in {}",
                            wide,
                            stringify!($t)
                        ))
                    })
                }
            }
        )*
    };
}

impl_try_get_narrow_int!(i8, i16, i32, u8, u16, u32, u64, usize);

impl TryGetable for f64 {
    fn try_get(value: Value) -> Result<Self, ValueExtractionError> {
        match value {
            Value::Float(x) => Ok(x),
            Value::Int(i) => Ok(i as f64),
            other => Err(mismatch("float", &other)),
        }
    }
}

impl TryGetable for f32 {
    fn try_get(value: Value) -> Result<Self, ValueExtractionError> {
        f64::try_get(value).map(|x| x as f32)
    }
}

impl TryGetable for bool {
    fn try_get(value: Value) -> Result<Self, ValueExtractionError> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::Int(0) => Ok(false),
            Value::Int(1) => Ok(true),
            Value::Int(i) => Err(ValueExtractionError::ConversionError(format!(
                "{} is not a boolean",
                i
            ))),
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl TryGetable for String {
    fn try_get(value: Value) -> Result<Self, ValueExtractionError> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(mismatch("text", &other)),
        }
    }
}

impl TryGetable for Vec<u8> {
    fn try_get(value: Value) -> Result<Self, ValueExtractionError> {
        match value {
            Value::Blob(b) => Ok(b),
            Value::Text(s) => Ok(s.into_bytes()),
            other => Err(mismatch("blob", &other)),
        }
    }
}

impl TryGetable for NaiveDateTime {
    fn try_get(value: Value) -> Result<Self, ValueExtractionError> {
        let text = String::try_get(value)?;
        NaiveDateTime::parse_from_str(&text, DATETIME_FORMAT)
            .map_err(|e| ValueExtractionError::ConversionError(format!("{text}: {e}")))
    }
}

impl TryGetable for NaiveDate {
    fn try_get(value: Value) -> Result<Self, ValueExtractionError> {
        let text = String::try_get(value)?;
        NaiveDate::parse_from_str(&text, DATE_FORMAT)
            .map_err(|e| ValueExtractionError::ConversionError(format!("{text}: {e}")))
    }
}

impl TryGetable for serde_json::Value {
    fn try_get(value: Value) -> Result<Self, ValueExtractionError> {
        match value {
            Value::Null => Ok(serde_json::Value::Null),
            Value::Text(s) => serde_json::from_str(&s)
                .map_err(|e| ValueExtractionError::ConversionError(format!("Invalid JSON: {e}"))),
            other => Err(mismatch("json text", &other)),
        }
    }
}

impl<T: TryGetable> TryGetable for Option<T> {
    fn try_get(value: Value) -> Result<Self, ValueExtractionError> {
        match value {
            Value::Null => Ok(None),
            other => T::try_get(other).map(Some),
        }
    }
}
