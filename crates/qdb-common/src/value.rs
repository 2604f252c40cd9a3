//! Runtime values carried by mapped fields.
//!
//! `Value` is a closed set of the value kinds the codec knows how to encode.
//! Record types convert their fields into it through [`IntoValue`].

use crate::bytes::Bytes;
use crate::error::CodecError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};

/// A field value, tagged with its runtime kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (a `None` field or an absent embedded record).
    Null,
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    Char(char),
    F32(f32),
    F64(f64),
    Str(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    Json(serde_json::Value),
}

impl Value {
    /// Name of the runtime kind, used in mismatch diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I8(_) => "i8",
            Value::U8(_) => "u8",
            Value::I16(_) => "i16",
            Value::U16(_) => "u16",
            Value::I32(_) => "i32",
            Value::U32(_) => "u32",
            Value::I64(_) => "i64",
            Value::U64(_) => "u64",
            Value::Char(_) => "char",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Timestamp(_) => "timestamp",
            Value::Json(_) => "json",
        }
    }

    /// Whether this is the zero value of its kind.
    ///
    /// Negative zero counts as zero, and an empty string or byte sequence is
    /// treated exactly like an absent one. A timestamp is zero at the Unix
    /// epoch.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(v) => !v,
            Value::I8(v) => *v == 0,
            Value::U8(v) => *v == 0,
            Value::I16(v) => *v == 0,
            Value::U16(v) => *v == 0,
            Value::I32(v) => *v == 0,
            Value::U32(v) => *v == 0,
            Value::I64(v) => *v == 0,
            Value::U64(v) => *v == 0,
            Value::Char(v) => *v == '\0',
            Value::F32(v) => *v == 0.0,
            Value::F64(v) => *v == 0.0,
            Value::Str(v) => v.is_empty(),
            Value::Bytes(v) => v.is_empty(),
            Value::Timestamp(v) => v.timestamp_micros() == 0,
            Value::Json(v) => v.is_null(),
        }
    }

    /// Whether this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convert into a JSON document.
    ///
    /// Bytes become a base64 string and timestamps an RFC 3339 string.
    /// Non-finite floats have no JSON form and become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as J;
        match self {
            Value::Null => J::Null,
            Value::Bool(v) => J::Bool(*v),
            Value::I8(v) => J::from(*v),
            Value::U8(v) => J::from(*v),
            Value::I16(v) => J::from(*v),
            Value::U16(v) => J::from(*v),
            Value::I32(v) => J::from(*v),
            Value::U32(v) => J::from(*v),
            Value::I64(v) => J::from(*v),
            Value::U64(v) => J::from(*v),
            Value::Char(v) => J::String(v.to_string()),
            Value::F32(v) => serde_json::Number::from_f64(f64::from(*v))
                .map(J::Number)
                .unwrap_or(J::Null),
            Value::F64(v) => serde_json::Number::from_f64(*v)
                .map(J::Number)
                .unwrap_or(J::Null),
            Value::Str(v) => J::String(v.clone()),
            Value::Bytes(v) => J::String(BASE64.encode(v)),
            Value::Timestamp(v) => J::String(v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Json(v) => v.clone(),
        }
    }
}

/// Conversion of a record field into a [`Value`].
///
/// `Option<T>` plays the role of a pointer field: `None` is null and `Some`
/// is classified by its pointee.
pub trait IntoValue {
    fn to_value(&self) -> Value;

    /// Fallible conversion for types whose encoding can fail, such as
    /// arbitrary serializable documents.
    fn try_to_value(&self) -> Result<Value, CodecError> {
        Ok(self.to_value())
    }
}

macro_rules! impl_into_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl IntoValue for $ty {
                fn to_value(&self) -> Value {
                    Value::$variant(*self)
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_into_value! {
    bool => Bool,
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    char => Char,
    f32 => F32,
    f64 => F64,
}

impl IntoValue for isize {
    fn to_value(&self) -> Value {
        Value::I64(*self as i64)
    }
}

impl IntoValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl IntoValue for str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl IntoValue for &str {
    fn to_value(&self) -> Value {
        Value::Str((*self).to_string())
    }
}

impl IntoValue for Vec<u8> {
    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }
}

impl IntoValue for Bytes {
    fn to_value(&self) -> Value {
        Value::Bytes(self.0.clone())
    }
}

impl IntoValue for DateTime<Utc> {
    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }
}

impl IntoValue for serde_json::Value {
    fn to_value(&self) -> Value {
        Value::Json(self.clone())
    }
}

impl IntoValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn try_to_value(&self) -> Result<Value, CodecError> {
        match self {
            Some(v) => v.try_to_value(),
            None => Ok(Value::Null),
        }
    }
}

impl<T: IntoValue + ?Sized> IntoValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn try_to_value(&self) -> Result<Value, CodecError> {
        (**self).try_to_value()
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}
