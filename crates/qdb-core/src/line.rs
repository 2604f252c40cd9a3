//! Line protocol rendering.
//!
//! `table[,symbol=val,...][ column=val,...][ timestamp]\n`

use qdb_common::ColumnType;

use crate::codec::{escape_name, timestamp_micros};
use crate::model::Model;

impl Model {
    /// Render the model as one ingestion line, newline terminated.
    ///
    /// Symbols come first, then the other columns, each in declaration order.
    /// The designated timestamp, when set, becomes the trailing token in raw
    /// epoch microseconds; without one the server assigns arrival time.
    pub fn to_line(&self) -> String {
        let mut symbols = Vec::new();
        let mut columns = Vec::new();
        for (field, bound) in self.fields() {
            let Some(text) = &bound.serialized else {
                continue;
            };
            if field.is_designated_ts() {
                continue;
            }
            let pair = format!("{}={}", escape_name(&field.column), text);
            if field.column_type == ColumnType::Symbol {
                symbols.push(pair);
            } else {
                columns.push(pair);
            }
        }

        let mut line = escape_name(self.table_name()).into_owned();
        if !symbols.is_empty() {
            line.push(',');
            line.push_str(&symbols.join(","));
        }
        if !columns.is_empty() {
            line.push(' ');
            line.push_str(&columns.join(","));
        }
        if let Some(micros) = self
            .designated_timestamp()
            .filter(|(_, bound)| bound.is_committed())
            .and_then(|(_, bound)| timestamp_micros(&bound.value))
        {
            line.push(' ');
            line.push_str(&micros.to_string());
        }
        line.push('\n');
        line
    }

    /// [`Model::to_line`] as bytes, ready for the ingestion transport.
    pub fn marshal_line(&self) -> Vec<u8> {
        self.to_line().into_bytes()
    }
}
