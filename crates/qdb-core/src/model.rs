//! Record model: a schema bound to one record's values.
//!
//! A model is built fresh for every write. The serialization pass classifies
//! each value as zero or not and encodes every value that will be sent:
//! non-zero values, and zero values of fields marked `commitZeroValue`.

use tracing::{debug, warn};

use qdb_common::{CodecError, Error, Result, Value};
use qdb_config::TableOptions;

use crate::codec::{serialize_value, zero_value};
use crate::record::{FieldSet, Record};
use crate::schema::{FieldSchema, Schema};

/// Value state of one bound field.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub value: Value,
    pub is_zero: bool,
    /// Store text, present for every field that will be sent.
    pub serialized: Option<String>,
}

impl Bound {
    fn new(value: Value) -> Self {
        Self {
            value,
            is_zero: false,
            serialized: None,
        }
    }

    /// Whether the field takes part in the ingestion line.
    pub fn is_committed(&self) -> bool {
        self.serialized.is_some()
    }
}

/// A schema bound to one record instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    schema: Schema,
    bound: Vec<Bound>,
}

impl Model {
    /// Derive the schema of `record`, bind its values and serialize them.
    pub fn new<R: Record>(record: &R) -> Result<Model> {
        let mut fields = FieldSet::new();
        record.describe(&mut fields);
        let (schema, values) = Schema::build(
            R::type_name(),
            record.table_name(),
            record.table_options(),
            fields.into_decls(),
        )?;

        let bound = schema
            .fields()
            .iter()
            .zip(values)
            .map(|(field, value)| {
                value.map(Bound::new).map_err(|source| Error::Codec {
                    field: field.path.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut model = Model { schema, bound };
        model.serialize()?;
        Ok(model)
    }

    /// Use `table_name` instead of the record's own.
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.schema.set_table_name(table_name.into());
        self
    }

    fn serialize(&mut self) -> Result<()> {
        for (field, bound) in self.schema.fields().iter().zip(self.bound.iter_mut()) {
            bound.is_zero = bound.value.is_zero();
            if bound.is_zero && !field.options.commit_zero_value {
                bound.serialized = None;
                continue;
            }

            let encoded = if bound.value.is_null() {
                match zero_value(field.column_type) {
                    Some(zero) => serialize_value(&zero, field.column_type),
                    None => Err(CodecError::Mismatch {
                        kind: bound.value.kind(),
                        column_type: field.column_type,
                    }),
                }
            } else {
                serialize_value(&bound.value, field.column_type)
            };

            match encoded {
                Ok(text) => bound.serialized = Some(text),
                Err(source) => {
                    warn!(field = %field.path, error = %source, "serialization failed");
                    return Err(Error::Codec {
                        field: field.path.clone(),
                        source,
                    });
                }
            }
        }
        debug!(
            table = self.schema.table_name(),
            committed = self.bound.iter().filter(|b| b.is_committed()).count(),
            "model serialized"
        );
        Ok(())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn table_name(&self) -> &str {
        self.schema.table_name()
    }

    pub fn table_options(&self) -> Option<&TableOptions> {
        self.schema.table_options()
    }

    /// Columns paired with their bound values, in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldSchema, &Bound)> {
        self.schema.fields().iter().zip(self.bound.iter())
    }

    /// The designated timestamp column and its value, if the record has one.
    pub fn designated_timestamp(&self) -> Option<(&FieldSchema, &Bound)> {
        let i = self.schema.designated_ts_index()?;
        Some((&self.schema.fields()[i], &self.bound[i]))
    }

    pub fn index_fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.schema.index_fields()
    }

    /// Comma separated column list, for selecting rows that scan back into
    /// this record type.
    pub fn columns(&self) -> String {
        self.schema.columns()
    }

    /// `SELECT <columns> FROM "<table>"`.
    pub fn select_statement(&self) -> String {
        format!(
            "SELECT {} FROM \"{}\"",
            self.columns(),
            self.schema.table_name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Reading {
        sensor: String,
        value: f64,
        count: Option<i64>,
        forced: i32,
    }

    impl Record for Reading {
        fn describe(&self, fields: &mut FieldSet) {
            fields
                .field("Sensor", "sensor;symbol", &self.sensor)
                .field("Value", "value;double", &self.value)
                .field("Count", "count;long;commitZeroValue:true", &self.count)
                .field("Forced", "forced;int;commitZeroValue:true", &self.forced);
        }
    }

    #[test]
    fn zero_fields_are_skipped_unless_forced() {
        let model = Model::new(&Reading {
            sensor: String::new(),
            value: 0.0,
            count: None,
            forced: 0,
        })
        .unwrap();

        let states: Vec<_> = model
            .fields()
            .map(|(f, b)| (f.column.as_str(), b.is_zero, b.serialized.as_deref()))
            .collect();
        assert_eq!(
            states,
            [
                ("sensor", true, None),
                ("value", true, None),
                ("count", true, Some("0i")),
                ("forced", true, Some("0i")),
            ]
        );
    }

    #[test]
    fn non_zero_fields_are_serialized() {
        let model = Model::new(&Reading {
            sensor: "t-1".into(),
            value: 21.5,
            count: Some(3),
            forced: 7,
        })
        .unwrap();
        let serialized: Vec<_> = model
            .fields()
            .map(|(_, b)| b.serialized.clone().unwrap())
            .collect();
        assert_eq!(serialized, ["t-1", "21.500000", "3i", "7i"]);
    }

    struct Mismatched {
        name: i32,
    }

    impl Record for Mismatched {
        fn describe(&self, fields: &mut FieldSet) {
            fields.field("Name", "name;string", &self.name);
        }
    }

    #[test]
    fn type_mismatch_names_field() {
        let err = Model::new(&Mismatched { name: 4 }).unwrap_err();
        assert_eq!(err.field(), Some("Name"));
        assert_eq!(err.code(), 30);
        assert!(err.to_string().contains("i32"));
        assert!(err.to_string().contains("string"));
    }

    #[test]
    fn zero_mismatch_is_not_checked_when_skipped() {
        // zero values that are skipped never reach the codec
        assert!(Model::new(&Mismatched { name: 0 }).is_ok());
    }

    #[test]
    fn columns_and_select() {
        let model = Model::new(&Reading {
            sensor: "a".into(),
            value: 1.0,
            count: None,
            forced: 1,
        })
        .unwrap()
        .with_table_name("readings_v2");
        assert_eq!(model.columns(), "sensor, value, count, forced");
        assert_eq!(
            model.select_statement(),
            "SELECT sensor, value, count, forced FROM \"readings_v2\""
        );
    }
}
