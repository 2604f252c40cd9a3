//! Shared vocabulary for the qdb record mapper.
//!
//! This crate provides the foundational types used by the mapping engine:
//! - Column types understood by the store and their DDL keywords
//! - The `Value` tagged union carried by every bound field
//! - Zero-value classification
//! - The `Bytes` binary newtype
//! - Common error types with stable codes

pub mod bytes;
pub mod column;
pub mod error;
pub mod value;

pub use bytes::Bytes;
pub use column::ColumnType;
pub use error::{BoxError, CodecError, Error, Result, ScanError, TagError};
pub use value::{IntoValue, Value};
