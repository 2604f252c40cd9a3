//! Type codec: runtime values to store text.
//!
//! Each column type accepts a fixed set of value kinds. Integers carry an `i`
//! marker, timestamps a `t` marker, floats are rendered fixed-point, and
//! anything that cannot travel raw on the line (bytes, JSON documents) is
//! base64 encoded and quoted.

use std::borrow::Cow;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use qdb_common::{CodecError, ColumnType, IntoValue, ScanError, Value};

/// Encode `value` as the store text for `column_type`.
pub fn serialize_value(value: &Value, column_type: ColumnType) -> Result<String, CodecError> {
    let out = match (column_type, value) {
        (ColumnType::Boolean, Value::Bool(v)) => v.to_string(),

        (ColumnType::Byte, Value::I8(v)) => format!("{v}i"),

        (ColumnType::Short, Value::U8(v)) => format!("{v}i"),
        (ColumnType::Short, Value::I8(v)) => format!("{v}i"),
        (ColumnType::Short, Value::I16(v)) => format!("{v}i"),

        (ColumnType::Char, Value::Char(v)) => v.to_string(),

        (ColumnType::Int, Value::U8(v)) => format!("{v}i"),
        (ColumnType::Int, Value::I8(v)) => format!("{v}i"),
        (ColumnType::Int, Value::U16(v)) => format!("{v}i"),
        (ColumnType::Int, Value::I16(v)) => format!("{v}i"),
        (ColumnType::Int, Value::I32(v)) => format!("{v}i"),

        (ColumnType::Float, Value::F32(v)) => format!("{v:.6}"),

        (ColumnType::Symbol, Value::Str(v)) => escape_symbol(v).into_owned(),

        (ColumnType::String, Value::Str(v)) => format!("\"{}\"", escape_string(v)),

        (ColumnType::Long, Value::U8(v)) => format!("{v}i"),
        (ColumnType::Long, Value::I8(v)) => format!("{v}i"),
        (ColumnType::Long, Value::U16(v)) => format!("{v}i"),
        (ColumnType::Long, Value::I16(v)) => format!("{v}i"),
        (ColumnType::Long, Value::U32(v)) => format!("{v}i"),
        (ColumnType::Long, Value::I32(v)) => format!("{v}i"),
        (ColumnType::Long, Value::I64(v)) => format!("{v}i"),
        (ColumnType::Long, Value::U64(v)) if i64::try_from(*v).is_ok() => format!("{v}i"),

        (ColumnType::Date, Value::I64(v)) => v.to_string(),
        (ColumnType::Date, Value::Timestamp(v)) => v.timestamp_millis().to_string(),

        (ColumnType::Timestamp, Value::I64(v)) => format!("{v}t"),
        (ColumnType::Timestamp, Value::Timestamp(v)) => format!("{}t", v.timestamp_micros()),

        (ColumnType::Double, Value::F32(v)) => format!("{v:.6}"),
        (ColumnType::Double, Value::F64(v)) => format!("{v:.6}"),

        (ColumnType::Binary, Value::Bytes(v)) => format!("\"{}\"", BASE64.encode(v)),
        (ColumnType::Binary, Value::Str(v)) => format!("\"{}\"", BASE64.encode(v.as_bytes())),

        (ColumnType::Json, v) => {
            let by = serde_json::to_vec(&v.to_json())?;
            format!("\"{}\"", BASE64.encode(by))
        }

        (ColumnType::Long256 | ColumnType::Geohash, _) => {
            return Err(CodecError::Unsupported(column_type))
        }

        (column_type, value) => {
            return Err(CodecError::Mismatch {
                kind: value.kind(),
                column_type,
            })
        }
    };
    Ok(out)
}

/// The value committed for an absent field that is forced through with
/// `commitZeroValue`. `None` when the type has no sensible zero on the line.
pub fn zero_value(column_type: ColumnType) -> Option<Value> {
    let v = match column_type {
        ColumnType::Boolean => Value::Bool(false),
        ColumnType::Byte => Value::I8(0),
        ColumnType::Short => Value::I16(0),
        ColumnType::Int => Value::I32(0),
        ColumnType::Long | ColumnType::Date | ColumnType::Timestamp => Value::I64(0),
        ColumnType::Float => Value::F32(0.0),
        ColumnType::Double => Value::F64(0.0),
        ColumnType::Symbol | ColumnType::String => Value::Str(String::new()),
        ColumnType::Binary => Value::Bytes(Vec::new()),
        ColumnType::Json => Value::Json(serde_json::Value::Null),
        ColumnType::Char | ColumnType::Long256 | ColumnType::Geohash => return None,
    };
    Some(v)
}

/// Epoch microseconds of a timestamp-typed value, for the trailing
/// designated timestamp token.
pub fn timestamp_micros(value: &Value) -> Option<i64> {
    match value {
        Value::I64(v) => Some(*v),
        Value::Timestamp(v) => Some(v.timestamp_micros()),
        Value::Null => Some(0),
        _ => None,
    }
}

/// Escape a table or column name for the line: space, comma, `=` and
/// newline are backslash escaped.
pub fn escape_name(name: &str) -> Cow<'_, str> {
    escape_with(name, |c| matches!(c, ' ' | ',' | '=' | '\n' | '\\'))
}

/// Symbol values follow the same escaping rules as names.
pub fn escape_symbol(value: &str) -> Cow<'_, str> {
    escape_name(value)
}

/// Escape the inside of a quoted string value: `"`, `\` and newline.
pub fn escape_string(value: &str) -> Cow<'_, str> {
    escape_with(value, |c| matches!(c, '"' | '\\' | '\n'))
}

fn escape_with(input: &str, needs_escape: impl Fn(char) -> bool) -> Cow<'_, str> {
    if !input.chars().any(&needs_escape) {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len() + 4);
    for c in input.chars() {
        if needs_escape(c) {
            out.push('\\');
        }
        out.push(c);
    }
    Cow::Owned(out)
}

/// Decode a `json` column read back from the store: base64 text holding a
/// JSON document.
pub fn decode_json<T: DeserializeOwned>(src: &Value) -> Result<T, ScanError> {
    match src {
        Value::Str(text) => Ok(serde_json::from_slice(&BASE64.decode(text)?)?),
        Value::Bytes(raw) => Ok(serde_json::from_slice(&BASE64.decode(raw)?)?),
        Value::Json(doc) => Ok(serde_json::from_value(doc.clone())?),
        other => Err(ScanError::Incompatible {
            kind: other.kind(),
            target: "json document",
        }),
    }
}

/// A serializable value stored in a `json` column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Serialize> IntoValue for Json<T> {
    fn to_value(&self) -> Value {
        self.try_to_value().unwrap_or(Value::Null)
    }

    fn try_to_value(&self) -> Result<Value, CodecError> {
        Ok(Value::Json(serde_json::to_value(&self.0)?))
    }
}
