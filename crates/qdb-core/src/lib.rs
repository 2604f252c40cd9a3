//! Schema-driven record mapping for QuestDB.
//!
//! Record types describe their fields with a short annotation per field
//! (`<column>;<type>[;key:value...]`). From that description this crate
//! derives a table schema and uses it to:
//! - render a record as an InfluxDB line protocol line for ingestion
//! - render a `CREATE TABLE IF NOT EXISTS` statement
//! - scan query result rows back into records
//!
//! ```
//! use qdb_core::{FieldSet, Model, Record};
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
//!
//! let user = User { name: "Ahmad".into(), email: "ahmad@x.io".into(), age: 29 };
//! let model = Model::new(&user).unwrap();
//! assert_eq!(model.to_line(), "users,Email=ahmad@x.io Name=\"Ahmad\",Age=29i\n");
//! ```

pub mod codec;
pub mod ddl;
pub mod line;
pub mod logging;
pub mod model;
pub mod record;
pub mod scan;
pub mod schema;
pub mod tag;
pub mod writer;

pub use codec::{decode_json, serialize_value, zero_value, Json};
pub use logging::init_logging;
pub use model::{Bound, Model};
pub use record::{FieldSet, FieldSetMut, Record, ScanRecord, MAX_EMBED_DEPTH};
pub use scan::{
    bind, scan_into, Destination, Row, ScanAdapter, ScanColumn, Scanner, Slot, ValueRow,
};
pub use schema::{FieldSchema, Schema};
pub use tag::{Directive, DirectiveKind, TagOptions};
pub use writer::{create_table_if_not_exists, BatchedWriter, Executor, LineWriter, WriteOptions};

pub use qdb_common::{
    BoxError, Bytes, CodecError, ColumnType, Error, IntoValue, Result, ScanError, TagError, Value,
};
pub use qdb_config::{PartitionBy, TableOptions, WriterConfig};
