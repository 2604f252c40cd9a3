//! Error types for the qdb record mapper.

use crate::column::ColumnType;
use thiserror::Error;

/// Result type alias for mapper operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error produced by an external transport (socket, SQL driver).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Malformed field annotation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("invalid tag length (expected at least 2 semicolon delimited items but got {found})")]
    TooFewSegments { found: usize },

    #[error("'{0}' is not valid option")]
    InvalidOption(String),

    #[error("column name is empty")]
    EmptyName,

    #[error("unknown column type '{0}'")]
    UnknownType(String),

    #[error("unsupported column type {0}")]
    UnsupportedType(ColumnType),

    #[error("type must be timestamp if 'designatedTS:true' option set (got {0})")]
    DesignatedNotTimestamp(ColumnType),

    #[error("type must be timestamp if 'designatedTS:true' option set (got embedded)")]
    DesignatedOnEmbedded,

    #[error("'embeddedPrefix' is required if type is embedded")]
    MissingEmbeddedPrefix,
}

/// A runtime value could not be encoded for its declared column type.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("value of kind {kind} is not compatible with {column_type}")]
    Mismatch {
        kind: &'static str,
        column_type: ColumnType,
    },

    #[error("column type {0} cannot be encoded")]
    Unsupported(ColumnType),

    #[error("could not json encode value: {0}")]
    Json(#[from] serde_json::Error),
}

/// A raw column value could not be decoded into its destination.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot scan {kind} into {target}")]
    Incompatible {
        kind: &'static str,
        target: &'static str,
    },

    #[error("value {value} out of range for {target}")]
    OutOfRange {
        value: String,
        target: &'static str,
    },

    #[error("could not base64 decode src: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("could not json decode src: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

/// Unified error type for the qdb record mapper.
#[derive(Error, Debug)]
pub enum Error {
    // Annotation errors (10-19)
    #[error("{field}: {source}")]
    Annotation {
        field: String,
        #[source]
        source: TagError,
    },

    #[error("{field}: embedded records nested deeper than {max} levels")]
    EmbedDepth { field: String, max: usize },

    #[error("{field}: annotation declares {declared} but the field is {actual}")]
    EmbedMismatch {
        field: String,
        declared: String,
        actual: &'static str,
    },

    // Schema invariant errors (20-29)
    #[error("multiple designated timestamp fields found: {first} and {second}")]
    DuplicateDesignatedTimestamp { first: String, second: String },

    // Type mismatch errors (30-39)
    #[error("{field}: {source}")]
    Codec {
        field: String,
        #[source]
        source: CodecError,
    },

    // Scan errors (40-49)
    #[error("{field}: {source}")]
    Scan {
        field: String,
        #[source]
        source: ScanError,
    },

    #[error("row has {actual} columns but the model binds {expected} destinations")]
    ColumnCount { expected: usize, actual: usize },

    // Transport errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    // Configuration errors (70-79)
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in structured logs.
    pub fn code(&self) -> u32 {
        match self {
            Error::Annotation { .. } => 10,
            Error::EmbedDepth { .. } => 11,
            Error::EmbedMismatch { .. } => 12,
            Error::DuplicateDesignatedTimestamp { .. } => 20,
            Error::Codec { .. } => 30,
            Error::Scan { .. } => 40,
            Error::ColumnCount { .. } => 41,
            Error::Io(_) => 60,
            Error::Transport(_) => 61,
            Error::Config(_) => 70,
        }
    }

    /// Dotted path of the field the error concerns, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::Annotation { field, .. }
            | Error::EmbedDepth { field, .. }
            | Error::EmbedMismatch { field, .. }
            | Error::Codec { field, .. }
            | Error::Scan { field, .. } => Some(field),
            _ => None,
        }
    }
}
