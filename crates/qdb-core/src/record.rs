//! Record description.
//!
//! A mappable type describes its own fields, in declaration order, through
//! [`Record::describe`] (values, for the write path) and
//! [`ScanRecord::describe_mut`] (storage slots, for the read path). Each
//! field is declared with its Rust field name and its annotation; embedded
//! sub-records are declared with `embedded` and describe themselves in turn.
//!
//! ```
//! use qdb_core::{FieldSet, Record};
//!
//! struct User {
//!     name: String,
//!     email: String,
//!     age: i32,
//! }
//!
//! impl Record for User {
//!     fn describe(&self, fields: &mut FieldSet) {
//!         fields
//!             .field("Name", "Name;string", &self.name)
//!             .field("Email", "Email;symbol", &self.email)
//!             .field("Age", "Age;int", &self.age);
//!     }
//! }
//! ```

use std::sync::LazyLock;

use regex::Regex;

use qdb_common::{CodecError, IntoValue, Value};
use qdb_config::TableOptions;

use crate::scan::{ScanColumn, Slot};

/// Embedding deeper than this is rejected, which also catches records that
/// embed themselves.
pub const MAX_EMBED_DEPTH: usize = 16;

/// A type that can be written as a row.
pub trait Record {
    /// Declare every field, in declaration order.
    fn describe(&self, fields: &mut FieldSet);

    /// Name the default table name is derived from.
    fn type_name() -> &'static str
    where
        Self: Sized,
    {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Explicit table name, overriding the derived one.
    fn table_name(&self) -> Option<String> {
        None
    }

    /// Options appended to the create-table statement.
    fn table_options(&self) -> Option<TableOptions> {
        None
    }
}

/// A type that query rows can be scanned into.
///
/// `describe_mut` must declare the same fields with the same annotations as
/// `describe`, so that the column list of the model pairs with the
/// destinations.
pub trait ScanRecord: Record {
    fn describe_mut<'r>(&'r mut self, fields: &mut FieldSetMut<'r>);
}

/// One declared field before its annotation is parsed.
#[derive(Debug)]
pub(crate) struct Decl<P> {
    pub name: String,
    pub tag: String,
    pub node: Node<P>,
}

#[derive(Debug)]
pub(crate) enum Node<P> {
    Leaf(P),
    Embedded(Vec<Decl<P>>),
    /// Embedding stopped at [`MAX_EMBED_DEPTH`].
    TooDeep,
}

/// Field declarations of a record, with owned values.
#[derive(Debug, Default)]
pub struct FieldSet {
    decls: Vec<Decl<Result<Value, CodecError>>>,
    depth: usize,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn nested(depth: usize) -> Self {
        Self {
            decls: Vec::new(),
            depth,
        }
    }

    /// Declare a column field.
    pub fn field<T: IntoValue + ?Sized>(&mut self, name: &str, tag: &str, value: &T) -> &mut Self {
        self.push(name, tag, Node::Leaf(value.try_to_value()));
        self
    }

    /// Declare an embedded sub-record.
    pub fn embedded<R: Record>(&mut self, name: &str, tag: &str, record: &R) -> &mut Self {
        let node = self.nest(|child| record.describe(child));
        self.push(name, tag, node);
        self
    }

    /// Declare an optional embedded sub-record. An absent record still
    /// contributes its columns, all null.
    pub fn embedded_opt<R: Record + Default>(
        &mut self,
        name: &str,
        tag: &str,
        record: Option<&R>,
    ) -> &mut Self {
        let node = match record {
            Some(record) => self.nest(|child| record.describe(child)),
            None => {
                let mut node = self.nest(|child| R::default().describe(child));
                nullify(&mut node);
                node
            }
        };
        self.push(name, tag, node);
        self
    }

    fn nest(&self, describe: impl FnOnce(&mut FieldSet)) -> Node<Result<Value, CodecError>> {
        if self.depth + 1 > MAX_EMBED_DEPTH {
            return Node::TooDeep;
        }
        let mut child = FieldSet::nested(self.depth + 1);
        describe(&mut child);
        Node::Embedded(child.decls)
    }

    fn push(&mut self, name: &str, tag: &str, node: Node<Result<Value, CodecError>>) {
        self.decls.push(Decl {
            name: name.to_string(),
            tag: tag.to_string(),
            node,
        });
    }

    pub(crate) fn into_decls(self) -> Vec<Decl<Result<Value, CodecError>>> {
        self.decls
    }
}

fn nullify(node: &mut Node<Result<Value, CodecError>>) {
    match node {
        Node::Leaf(value) => *value = Ok(Value::Null),
        Node::Embedded(children) => children.iter_mut().for_each(|d| nullify(&mut d.node)),
        Node::TooDeep => {}
    }
}

/// Field declarations of a record, as mutable storage slots.
pub struct FieldSetMut<'r> {
    decls: Vec<Decl<Slot<'r>>>,
    depth: usize,
}

impl<'r> FieldSetMut<'r> {
    pub fn new() -> Self {
        Self::nested(0)
    }

    fn nested(depth: usize) -> Self {
        Self {
            decls: Vec::new(),
            depth,
        }
    }

    /// Declare a column slot.
    pub fn field<T: ScanColumn + 'r>(
        &mut self,
        name: &str,
        tag: &str,
        slot: &'r mut T,
    ) -> &mut Self {
        self.push(name, tag, Node::Leaf(slot.into_slot()));
        self
    }

    /// Declare an embedded sub-record.
    pub fn embedded<R: ScanRecord>(
        &mut self,
        name: &str,
        tag: &str,
        record: &'r mut R,
    ) -> &mut Self {
        let node = if self.depth + 1 > MAX_EMBED_DEPTH {
            Node::TooDeep
        } else {
            let mut child = FieldSetMut::nested(self.depth + 1);
            record.describe_mut(&mut child);
            Node::Embedded(child.decls)
        };
        self.push(name, tag, node);
        self
    }

    /// Declare an optional embedded sub-record. An absent record is filled
    /// with its default so the row has somewhere to land.
    pub fn embedded_opt<R: ScanRecord + Default>(
        &mut self,
        name: &str,
        tag: &str,
        record: &'r mut Option<R>,
    ) -> &mut Self {
        let record = record.get_or_insert_with(R::default);
        self.embedded(name, tag, record)
    }

    fn push(&mut self, name: &str, tag: &str, node: Node<Slot<'r>>) {
        self.decls.push(Decl {
            name: name.to_string(),
            tag: tag.to_string(),
            node,
        });
    }

    pub(crate) fn into_decls(self) -> Vec<Decl<Slot<'r>>> {
        self.decls
    }
}

impl Default for FieldSetMut<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Last path segment of a type name, without generic arguments.
pub fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

static FIRST_CAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("regex"));
static ALL_CAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("regex"));

/// `SensorReading` -> `sensor_reading`.
pub fn to_snake_case(name: &str) -> String {
    let snake = FIRST_CAP.replace_all(name, "${1}_${2}");
    let snake = ALL_CAP.replace_all(&snake, "${1}_${2}");
    snake.to_lowercase()
}

/// Pluralized snake case of a type name: `SensorReading` -> `sensor_readings`.
pub fn default_table_name(type_name: &str) -> String {
    format!("{}s", to_snake_case(type_name))
}
