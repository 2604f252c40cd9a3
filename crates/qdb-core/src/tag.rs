//! Field annotation parsing.
//!
//! An annotation has the form `<column>;<type>[;key:value...]`, or `-` to
//! leave the field out of the schema. Recognized option keys are
//! `embeddedPrefix`, `designatedTS`, `commitZeroValue` and `index`; unknown
//! keys are accepted and ignored.

use tracing::trace;

use qdb_common::{ColumnType, TagError};

/// Annotation value that excludes a field from the schema.
pub const EXCLUDE: &str = "-";

/// Type name that marks a field as an embedded sub-record.
pub const EMBEDDED: &str = "embedded";

/// What a field maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveKind {
    /// A single column of the given type.
    Column(ColumnType),
    /// A sub-record whose fields are flattened into the parent, with every
    /// column name prefixed.
    Embedded { prefix: String },
}

/// Options set by the trailing `key:value` segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagOptions {
    pub embedded_prefix: String,
    pub designated_ts: bool,
    pub commit_zero_value: bool,
    pub index: bool,
}

/// Parsed field annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Wire column name, before any embedding prefix is applied.
    pub name: String,
    pub kind: DirectiveKind,
    pub options: TagOptions,
}

impl Directive {
    /// Parse an annotation. Returns `Ok(None)` for the exclusion sentinel.
    pub fn parse(tag: &str) -> Result<Option<Directive>, TagError> {
        if tag == EXCLUDE {
            return Ok(None);
        }

        let segments: Vec<&str> = tag.split(';').collect();
        if segments.len() < 2 {
            return Err(TagError::TooFewSegments {
                found: segments.len(),
            });
        }

        let name = segments[0];
        if name.is_empty() {
            return Err(TagError::EmptyName);
        }

        let opts = parse_options(&segments[2..])?;
        let type_name = segments[1];

        let kind = if type_name == EMBEDDED {
            if opts.embedded_prefix.is_empty() {
                return Err(TagError::MissingEmbeddedPrefix);
            }
            if opts.designated_ts {
                return Err(TagError::DesignatedOnEmbedded);
            }
            DirectiveKind::Embedded {
                prefix: opts.embedded_prefix.clone(),
            }
        } else {
            let column_type = ColumnType::from_name(type_name)
                .ok_or_else(|| TagError::UnknownType(type_name.to_string()))?;
            if !column_type.is_supported() {
                return Err(TagError::UnsupportedType(column_type));
            }
            if opts.designated_ts && column_type != ColumnType::Timestamp {
                return Err(TagError::DesignatedNotTimestamp(column_type));
            }
            DirectiveKind::Column(column_type)
        };

        Ok(Some(Directive {
            name: name.to_string(),
            kind,
            options: opts,
        }))
    }

    /// Column type, or `None` for an embedded directive.
    pub fn column_type(&self) -> Option<ColumnType> {
        match self.kind {
            DirectiveKind::Column(t) => Some(t),
            DirectiveKind::Embedded { .. } => None,
        }
    }
}

fn parse_options(segments: &[&str]) -> Result<TagOptions, TagError> {
    let mut opts = TagOptions::default();
    for segment in segments {
        let Some((key, value)) = split_option(segment) else {
            return Err(TagError::InvalidOption(segment.to_string()));
        };
        match key {
            "embeddedPrefix" => opts.embedded_prefix = value.to_string(),
            "designatedTS" => opts.designated_ts = value == "true",
            "commitZeroValue" => opts.commit_zero_value = value == "true",
            "index" => opts.index = value == "true",
            other => trace!(option = other, "ignoring unknown tag option"),
        }
    }
    Ok(opts)
}

/// Split `key:value`, requiring exactly one `:`.
fn split_option(segment: &str) -> Option<(&str, &str)> {
    let (key, value) = segment.split_once(':')?;
    if value.contains(':') {
        return None;
    }
    Some((key, value))
}
