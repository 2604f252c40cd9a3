//! Scan binding: query result columns back onto record fields.
//!
//! A model built from a destination record yields one [`Destination`] per
//! column, in column-list order, each pointing at the field's storage. Field
//! types decode raw column values through [`ScanColumn`]; types with their
//! own decoding implement [`Scanner`] and route through a [`ScanAdapter`].

use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

use qdb_common::{Bytes, Error, Result, ScanError, Value};

use crate::codec::{decode_json, Json};
use crate::record::ScanRecord;
use crate::schema::Schema;

/// Custom decoding of a raw column value.
pub trait Scanner {
    fn scan(&mut self, src: Value) -> std::result::Result<(), ScanError>;
}

/// Default decoding of a raw column value into a field type.
pub trait ScanColumn {
    fn scan_column(&mut self, src: Value) -> std::result::Result<(), ScanError>;

    /// How this slot is bound. Types with custom scan behaviour override
    /// this to wrap themselves in a [`ScanAdapter`].
    fn into_slot<'r>(&'r mut self) -> Slot<'r>
    where
        Self: Sized + 'r,
    {
        Slot::Direct(self)
    }
}

/// Proxies the generic scan callback to a [`Scanner`].
pub struct ScanAdapter<'r> {
    inner: &'r mut dyn Scanner,
}

impl<'r> ScanAdapter<'r> {
    pub fn new(inner: &'r mut dyn Scanner) -> Self {
        Self { inner }
    }

    fn scan(&mut self, src: Value) -> std::result::Result<(), ScanError> {
        self.inner.scan(src)
    }
}

/// Storage location of one field.
pub enum Slot<'r> {
    Direct(&'r mut dyn ScanColumn),
    Adapted(ScanAdapter<'r>),
}

impl std::fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Direct(_) => f.write_str("Slot::Direct"),
            Slot::Adapted(_) => f.write_str("Slot::Adapted"),
        }
    }
}

/// A bound scan destination: one column of the result row.
#[derive(Debug)]
pub struct Destination<'r> {
    field: String,
    column: String,
    slot: Slot<'r>,
}

impl<'r> Destination<'r> {
    pub(crate) fn new(field: String, column: String, slot: Slot<'r>) -> Self {
        Self {
            field,
            column,
            slot,
        }
    }

    /// Dotted path of the record field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Wire column name.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Whether the field's type decodes through a custom [`Scanner`].
    pub fn is_adapted(&self) -> bool {
        matches!(self.slot, Slot::Adapted(_))
    }

    /// Decode `src` into the field.
    pub fn assign(&mut self, src: Value) -> Result<()> {
        let res = match &mut self.slot {
            Slot::Direct(slot) => slot.scan_column(src),
            Slot::Adapted(adapter) => adapter.scan(src),
        };
        res.map_err(|source| Error::Scan {
            field: self.field.clone(),
            source,
        })
    }
}

/// A result row from the query transport.
pub trait Row {
    /// Fetch every column into the matching destination.
    fn scan(&mut self, destinations: &mut [Destination<'_>]) -> Result<()>;
}

/// A row already materialized as values, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueRow(pub Vec<Value>);

impl Row for ValueRow {
    fn scan(&mut self, destinations: &mut [Destination<'_>]) -> Result<()> {
        if self.0.len() != destinations.len() {
            return Err(Error::ColumnCount {
                expected: destinations.len(),
                actual: self.0.len(),
            });
        }
        for (dest, value) in destinations.iter_mut().zip(self.0.drain(..)) {
            dest.assign(value)?;
        }
        Ok(())
    }
}

/// Bind destinations for every field of `dest`, in schema column order.
pub fn bind<'r, R: ScanRecord>(dest: &'r mut R) -> Result<(Schema, Vec<Destination<'r>>)> {
    let table_name = dest.table_name();
    let table_options = dest.table_options();
    let mut fields = crate::record::FieldSetMut::new();
    dest.describe_mut(&mut fields);
    let (schema, slots) = Schema::build(
        R::type_name(),
        table_name,
        table_options,
        fields.into_decls(),
    )?;
    let destinations = schema
        .fields()
        .iter()
        .zip(slots)
        .map(|(f, slot)| Destination::new(f.path.clone(), f.column.clone(), slot))
        .collect();
    Ok((schema, destinations))
}

/// Scan `row` into `dest`. The row's columns must come from a query that
/// selects the model's column list.
pub fn scan_into<R: ScanRecord, W: Row + ?Sized>(row: &mut W, dest: &mut R) -> Result<()> {
    let (schema, mut destinations) = bind(dest)?;
    debug!(
        table = schema.table_name(),
        columns = destinations.len(),
        "scanning row"
    );
    row.scan(&mut destinations)
}

// ---------------------------------------------------------------------------
// Default decoders
// ---------------------------------------------------------------------------

fn as_i128(src: &Value) -> Option<i128> {
    match *src {
        Value::I8(v) => Some(v.into()),
        Value::U8(v) => Some(v.into()),
        Value::I16(v) => Some(v.into()),
        Value::U16(v) => Some(v.into()),
        Value::I32(v) => Some(v.into()),
        Value::U32(v) => Some(v.into()),
        Value::I64(v) => Some(v.into()),
        Value::U64(v) => Some(v.into()),
        _ => None,
    }
}

macro_rules! impl_scan_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ScanColumn for $ty {
                fn scan_column(&mut self, src: Value) -> std::result::Result<(), ScanError> {
                    let wide = as_i128(&src).ok_or(ScanError::Incompatible {
                        kind: src.kind(),
                        target: stringify!($ty),
                    })?;
                    *self = <$ty>::try_from(wide).map_err(|_| ScanError::OutOfRange {
                        value: wide.to_string(),
                        target: stringify!($ty),
                    })?;
                    Ok(())
                }
            }
        )*
    };
}

impl_scan_int!(i8, u8, i16, u16, i32, u32, i64, u64);

impl ScanColumn for bool {
    fn scan_column(&mut self, src: Value) -> std::result::Result<(), ScanError> {
        match src {
            Value::Bool(v) => {
                *self = v;
                Ok(())
            }
            other => Err(ScanError::Incompatible {
                kind: other.kind(),
                target: "bool",
            }),
        }
    }
}

impl ScanColumn for f64 {
    fn scan_column(&mut self, src: Value) -> std::result::Result<(), ScanError> {
        *self = match src {
            Value::F64(v) => v,
            Value::F32(v) => v.into(),
            other => match as_i128(&other) {
                Some(v) => v as f64,
                None => {
                    return Err(ScanError::Incompatible {
                        kind: other.kind(),
                        target: "f64",
                    })
                }
            },
        };
        Ok(())
    }
}

impl ScanColumn for f32 {
    fn scan_column(&mut self, src: Value) -> std::result::Result<(), ScanError> {
        *self = match src {
            Value::F32(v) => v,
            Value::F64(v) => v as f32,
            other => {
                return Err(ScanError::Incompatible {
                    kind: other.kind(),
                    target: "f32",
                })
            }
        };
        Ok(())
    }
}

impl ScanColumn for char {
    fn scan_column(&mut self, src: Value) -> std::result::Result<(), ScanError> {
        *self = match src {
            Value::Char(c) => c,
            Value::Str(ref s) if s.chars().count() == 1 => {
                s.chars().next().unwrap_or_default()
            }
            other => {
                return Err(ScanError::Incompatible {
                    kind: other.kind(),
                    target: "char",
                })
            }
        };
        Ok(())
    }
}

impl ScanColumn for String {
    fn scan_column(&mut self, src: Value) -> std::result::Result<(), ScanError> {
        *self = match src {
            Value::Str(s) => s,
            Value::Bytes(b) => String::from_utf8(b).map_err(|e| ScanError::Custom(e.to_string()))?,
            other => {
                return Err(ScanError::Incompatible {
                    kind: other.kind(),
                    target: "String",
                })
            }
        };
        Ok(())
    }
}

impl ScanColumn for Vec<u8> {
    fn scan_column(&mut self, src: Value) -> std::result::Result<(), ScanError> {
        *self = match src {
            Value::Bytes(b) => b,
            Value::Str(s) => s.into_bytes(),
            other => {
                return Err(ScanError::Incompatible {
                    kind: other.kind(),
                    target: "Vec<u8>",
                })
            }
        };
        Ok(())
    }
}

impl ScanColumn for DateTime<Utc> {
    fn scan_column(&mut self, src: Value) -> std::result::Result<(), ScanError> {
        *self = match src {
            Value::Timestamp(t) => t,
            Value::I64(micros) => Utc.timestamp_micros(micros).single().ok_or(
                ScanError::OutOfRange {
                    value: micros.to_string(),
                    target: "DateTime<Utc>",
                },
            )?,
            other => {
                return Err(ScanError::Incompatible {
                    kind: other.kind(),
                    target: "DateTime<Utc>",
                })
            }
        };
        Ok(())
    }
}

impl ScanColumn for serde_json::Value {
    fn scan_column(&mut self, src: Value) -> std::result::Result<(), ScanError> {
        *self = match src {
            Value::Null => serde_json::Value::Null,
            Value::Json(v) => v,
            other => decode_json(&other)?,
        };
        Ok(())
    }
}

/// `None` for a null column, otherwise the pointee decodes the value.
impl<T: ScanColumn + Default> ScanColumn for Option<T> {
    fn scan_column(&mut self, src: Value) -> std::result::Result<(), ScanError> {
        if src.is_null() {
            *self = None;
            return Ok(());
        }
        self.get_or_insert_with(T::default).scan_column(src)
    }
}

impl Scanner for Bytes {
    fn scan(&mut self, src: Value) -> std::result::Result<(), ScanError> {
        match src {
            Value::Str(text) => *self = Bytes::from_base64(&text)?,
            Value::Bytes(raw) => *self = Bytes(raw),
            other => {
                return Err(ScanError::Incompatible {
                    kind: other.kind(),
                    target: "Bytes",
                })
            }
        }
        Ok(())
    }
}

impl ScanColumn for Bytes {
    fn scan_column(&mut self, src: Value) -> std::result::Result<(), ScanError> {
        Scanner::scan(self, src)
    }

    fn into_slot<'r>(&'r mut self) -> Slot<'r>
    where
        Self: Sized + 'r,
    {
        Slot::Adapted(ScanAdapter::new(self))
    }
}

impl<T: serde::de::DeserializeOwned> Scanner for Json<T> {
    fn scan(&mut self, src: Value) -> std::result::Result<(), ScanError> {
        self.0 = decode_json(&src)?;
        Ok(())
    }
}

impl<T: serde::de::DeserializeOwned> ScanColumn for Json<T> {
    fn scan_column(&mut self, src: Value) -> std::result::Result<(), ScanError> {
        Scanner::scan(self, src)
    }

    fn into_slot<'r>(&'r mut self) -> Slot<'r>
    where
        Self: Sized + 'r,
    {
        Slot::Adapted(ScanAdapter::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_widen_and_range_check() {
        let mut a: i64 = 0;
        a.scan_column(Value::I32(-5)).unwrap();
        assert_eq!(a, -5);

        let mut b: u8 = 0;
        let err = b.scan_column(Value::I64(300)).unwrap_err();
        assert!(matches!(err, ScanError::OutOfRange { target: "u8", .. }));

        let mut c: i32 = 0;
        let err = c.scan_column(Value::Str("1".into())).unwrap_err();
        assert!(matches!(err, ScanError::Incompatible { kind: "string", .. }));
    }

    #[test]
    fn option_takes_null_as_none() {
        let mut v: Option<i32> = Some(3);
        v.scan_column(Value::Null).unwrap();
        assert_eq!(v, None);
        v.scan_column(Value::I32(9)).unwrap();
        assert_eq!(v, Some(9));
    }

    #[test]
    fn timestamp_from_micros() {
        let mut t = DateTime::<Utc>::default();
        t.scan_column(Value::I64(1_500_000)).unwrap();
        assert_eq!(t.timestamp_micros(), 1_500_000);
    }

    #[test]
    fn bytes_bind_through_adapter() {
        let mut b = Bytes::default();
        let mut dest = Destination::new("Payload".into(), "payload".into(), b.into_slot());
        assert!(dest.is_adapted());
        dest.assign(Value::Str("AQI=".into())).unwrap();
        drop(dest);
        assert_eq!(b.0, vec![1, 2]);
    }

    #[test]
    fn plain_fields_bind_directly() {
        let mut s = String::new();
        let dest = Destination::new("Name".into(), "name".into(), s.into_slot());
        assert!(!dest.is_adapted());
    }

    #[test]
    fn assign_error_names_field() {
        let mut b = false;
        let mut dest = Destination::new("Flag".into(), "flag".into(), b.into_slot());
        let err = dest.assign(Value::I32(1)).unwrap_err();
        assert_eq!(err.field(), Some("Flag"));
        assert_eq!(err.to_string(), "Flag: cannot scan i32 into bool");
    }

    #[test]
    fn value_row_checks_column_count() {
        let mut x = 0i32;
        let mut dests = vec![Destination::new("X".into(), "x".into(), x.into_slot())];
        let mut row = ValueRow(vec![Value::I32(1), Value::I32(2)]);
        let err = row.scan(&mut dests).unwrap_err();
        assert!(matches!(
            err,
            Error::ColumnCount {
                expected: 1,
                actual: 2
            }
        ));
    }
}
