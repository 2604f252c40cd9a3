//! Schema derivation.
//!
//! Field declarations are walked in order; each annotation is parsed, and
//! embedded sub-records are flattened in place, depth first. Embedded fields
//! get a dotted path (`Location.Lat`) and a prefixed column name
//! (`loc_lat`). Once the flat list exists it is scanned once for the
//! designated timestamp and the indexed columns, so every error names the
//! full path of the field it concerns.

use tracing::debug;

use qdb_common::{ColumnType, Error, Result};
use qdb_config::TableOptions;

use crate::record::{default_table_name, Decl, FieldSet, Node, Record, MAX_EMBED_DEPTH};
use crate::tag::{Directive, DirectiveKind, TagOptions};

/// One column of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    /// Dotted path of the field within the record.
    pub path: String,
    /// Wire column name, including embedding prefixes.
    pub column: String,
    pub column_type: ColumnType,
    pub options: TagOptions,
}

impl FieldSchema {
    pub fn is_designated_ts(&self) -> bool {
        self.options.designated_ts
    }
}

/// Derived table layout of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    table_name: String,
    fields: Vec<FieldSchema>,
    designated_ts: Option<usize>,
    index_fields: Vec<usize>,
    table_options: Option<TableOptions>,
}

impl Schema {
    /// Derive the schema of `record`. The result depends only on the record's
    /// type and annotations, never on its values.
    pub fn of<R: Record>(record: &R) -> Result<Schema> {
        let mut fields = FieldSet::new();
        record.describe(&mut fields);
        let (schema, _) = Schema::build(
            R::type_name(),
            record.table_name(),
            record.table_options(),
            fields.into_decls(),
        )?;
        Ok(schema)
    }

    pub(crate) fn build<P>(
        type_name: &str,
        table_name: Option<String>,
        table_options: Option<TableOptions>,
        decls: Vec<Decl<P>>,
    ) -> Result<(Schema, Vec<P>)> {
        let mut fields = Vec::new();
        let mut payloads = Vec::new();
        flatten(decls, "", "", &mut fields, &mut payloads)?;

        let mut designated_ts: Option<usize> = None;
        let mut index_fields = Vec::new();
        for (i, field) in fields.iter().enumerate() {
            if field.options.designated_ts {
                if let Some(first) = designated_ts {
                    return Err(Error::DuplicateDesignatedTimestamp {
                        first: fields[first].path.clone(),
                        second: field.path.clone(),
                    });
                }
                designated_ts = Some(i);
            }
            if field.options.index {
                index_fields.push(i);
            }
        }

        let table_name = table_name.unwrap_or_else(|| default_table_name(type_name));
        debug!(
            table = %table_name,
            fields = fields.len(),
            indexed = index_fields.len(),
            designated_ts = designated_ts.is_some(),
            "schema derived"
        );

        let schema = Schema {
            table_name,
            fields,
            designated_ts,
            index_fields,
            table_options,
        };
        Ok((schema, payloads))
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub(crate) fn set_table_name(&mut self, table_name: String) {
        self.table_name = table_name;
    }

    /// Columns in declaration order, embedded fields flattened in place.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn designated_ts(&self) -> Option<&FieldSchema> {
        self.designated_ts.map(|i| &self.fields[i])
    }

    pub(crate) fn designated_ts_index(&self) -> Option<usize> {
        self.designated_ts
    }

    pub fn index_fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.index_fields.iter().map(|&i| &self.fields[i])
    }

    pub fn table_options(&self) -> Option<&TableOptions> {
        self.table_options.as_ref()
    }

    /// Comma separated column list: `a, b, c`.
    pub fn columns(&self) -> String {
        self.fields
            .iter()
            .map(|f| f.column.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn flatten<P>(
    decls: Vec<Decl<P>>,
    path_prefix: &str,
    column_prefix: &str,
    fields: &mut Vec<FieldSchema>,
    payloads: &mut Vec<P>,
) -> Result<()> {
    for decl in decls {
        let path = format!("{path_prefix}{}", decl.name);

        let directive = Directive::parse(&decl.tag).map_err(|source| Error::Annotation {
            field: path.clone(),
            source,
        })?;
        let Some(Directive {
            name,
            kind,
            options,
        }) = directive
        else {
            continue;
        };

        match (kind, decl.node) {
            (DirectiveKind::Embedded { prefix }, Node::Embedded(children)) => {
                let nested_path = format!("{path}.");
                let nested_columns = format!("{column_prefix}{prefix}");
                flatten(children, &nested_path, &nested_columns, fields, payloads)?;
            }
            (DirectiveKind::Embedded { .. }, Node::TooDeep) => {
                return Err(Error::EmbedDepth {
                    field: path,
                    max: MAX_EMBED_DEPTH,
                });
            }
            (DirectiveKind::Embedded { .. }, Node::Leaf(_)) => {
                return Err(Error::EmbedMismatch {
                    field: path,
                    declared: "embedded".to_string(),
                    actual: "a column value",
                });
            }
            (DirectiveKind::Column(column_type), Node::Leaf(payload)) => {
                fields.push(FieldSchema {
                    path,
                    column: format!("{column_prefix}{name}"),
                    column_type,
                    options,
                });
                payloads.push(payload);
            }
            (DirectiveKind::Column(column_type), Node::Embedded(_) | Node::TooDeep) => {
                return Err(Error::EmbedMismatch {
                    field: path,
                    declared: column_type.to_string(),
                    actual: "an embedded record",
                });
            }
        }
    }
    Ok(())
}
