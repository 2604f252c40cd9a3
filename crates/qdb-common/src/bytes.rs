//! Binary column payloads.
//!
//! The ingestion line cannot carry raw bytes, and the query wire cannot
//! accept them either, so binary fields travel as base64 text. `Bytes` is a
//! `Vec<u8>` that knows how to make that trip in both directions.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

use crate::error::ScanError;

/// Owned byte payload for `binary` columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Bytes(bytes.into())
    }

    /// Base64 text form, as stored by the store.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.0)
    }

    /// Decode the base64 text form read back from the store.
    pub fn from_base64(text: &str) -> Result<Self, ScanError> {
        Ok(Bytes(BASE64.decode(text)?))
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Bytes {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Bytes {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self {
        Bytes(v)
    }
}

impl From<&[u8]> for Bytes {
    fn from(v: &[u8]) -> Self {
        Bytes(v.to_vec())
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_text_form() {
        let b = Bytes::new(vec![0x01, 0x02]);
        assert_eq!(b.to_base64(), "AQI=");
        assert_eq!(Bytes::from_base64("AQI=").unwrap(), b);
    }

    #[test]
    fn invalid_base64_is_scan_error() {
        let err = Bytes::from_base64("not base64!").unwrap_err();
        assert!(matches!(err, ScanError::Base64(_)));
    }
}
