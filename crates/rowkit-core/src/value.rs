//! Dynamic SQL values bound as statement parameters.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// A dynamically-typed SQL value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// NULL
    Null,
    /// Boolean
    Bool(bool),
    /// 8-bit integer
    TinyInt(i8),
    /// 16-bit integer
    SmallInt(i16),
    /// 32-bit integer
    Int(i32),
    /// 64-bit integer
    BigInt(i64),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// Arbitrary precision decimal kept as text
    Decimal(String),
    /// Text
    Text(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// Microseconds since the Unix epoch (UTC)
    Timestamp(i64),
    /// JSON document
    Json(serde_json::Value),
    /// Array of values
    Array(Vec<Value>),
}

impl Value {
    /// The current wall-clock time as a [`Value::Timestamp`].
    #[must_use]
    pub fn now() -> Self {
        Value::Timestamp(now_micros())
    }

    /// Whether this value is the zero value of its type.
    ///
    /// NULL, `false`, numeric zero, empty text/bytes/arrays, the epoch and
    /// JSON `null` are blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !*b,
            Value::TinyInt(v) => *v == 0,
            Value::SmallInt(v) => *v == 0,
            Value::Int(v) => *v == 0,
            Value::BigInt(v) | Value::Timestamp(v) => *v == 0,
            Value::Float(v) => *v == 0.0,
            Value::Double(v) => *v == 0.0,
            Value::Decimal(s) | Value::Text(s) => s.is_empty(),
            Value::Bytes(b) => b.is_empty(),
            Value::Json(j) => j.is_null(),
            Value::Array(a) => a.is_empty(),
        }
    }

    /// Whether this value is NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text content, if this is a text value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Decimal(s) => Some(s),
            _ => None,
        }
    }

    /// Integer content widened to `i64`, for any integer or timestamp value.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::TinyInt(v) => Some(i64::from(*v)),
            Value::SmallInt(v) => Some(i64::from(*v)),
            Value::Int(v) => Some(i64::from(*v)),
            Value::BigInt(v) | Value::Timestamp(v) => Some(*v),
            _ => None,
        }
    }

    /// Short name of the variant, used in conversion errors.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "BOOLEAN",
            Value::TinyInt(_) => "TINYINT",
            Value::SmallInt(_) => "SMALLINT",
            Value::Int(_) => "INTEGER",
            Value::BigInt(_) => "BIGINT",
            Value::Float(_) => "REAL",
            Value::Double(_) => "DOUBLE",
            Value::Decimal(_) => "DECIMAL",
            Value::Text(_) => "TEXT",
            Value::Bytes(_) => "BLOB",
            Value::Timestamp(_) => "TIMESTAMP",
            Value::Json(_) => "JSON",
            Value::Array(_) => "ARRAY",
        }
    }
}

/// Microseconds since the Unix epoch, saturating on clock skew.
#[must_use]
pub fn now_micros() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_micros()).unwrap_or(i64::MAX))
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool,
    i8 => TinyInt,
    i16 => SmallInt,
    i32 => Int,
    i64 => BigInt,
    f32 => Float,
    f64 => Double,
    String => Text,
    Vec<u8> => Bytes,
    serde_json::Value => Json,
}

// Unsigned integers widen into the next signed variant.
impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::SmallInt(i16::from(v))
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::Int(i32::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::BigInt(i64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Conversion from a [`Value`] back into a Rust field type.
///
/// Used by generated `Model::set_value` implementations when a hook assigns
/// an identifier or a timestamp.
pub trait FromValue: Sized {
    /// Convert, failing with a shape error on a type mismatch.
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch<T>(expected: &str, value: &Value) -> Result<T> {
    Err(Error::Shape(format!(
        "cannot convert {} into {}",
        value.type_name(),
        expected
    )))
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) | Value::Decimal(s) => Ok(s),
            other => mismatch("String", &other),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => mismatch("bool", &other),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self> {
        value.as_i64().map_or_else(|| mismatch("i64", &value), Ok)
    }
}

macro_rules! impl_narrowing_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self> {
                    match value.as_i64().map(<$ty>::try_from) {
                        Some(Ok(v)) => Ok(v),
                        _ => mismatch(stringify!($ty), &value),
                    }
                }
            }
        )*
    };
}

impl_narrowing_from_value!(i8, i16, i32, u8, u16, u32);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Double(v) => Ok(v),
            Value::Float(v) => Ok(f64::from(v)),
            other => mismatch("f64", &other),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float(v) => Ok(v),
            #[allow(clippy::cast_possible_truncation)]
            Value::Double(v) if f64::from(v as f32) == v => Ok(v as f32),
            other => mismatch("f32", &other),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bytes(b) => Ok(b),
            other => mismatch("Vec<u8>", &other),
        }
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Json(j) => Ok(j),
            Value::Null => Ok(serde_json::Value::Null),
            other => mismatch("JSON", &other),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
