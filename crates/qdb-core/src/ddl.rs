//! Create-table statements.

use crate::model::Model;

/// Column added when the record has no designated timestamp of its own.
pub const IMPLICIT_TIMESTAMP: &str = "timestamp";

impl Model {
    /// `CREATE TABLE IF NOT EXISTS` statement for the model's table.
    ///
    /// Binary and json columns are declared as `string`, since they travel as
    /// base64 text.
    pub fn create_table_statement(&self) -> String {
        let designated = self.designated_timestamp().map(|(f, _)| f.column.as_str());

        let mut columns: Vec<String> = self
            .schema()
            .fields()
            .iter()
            .map(|f| format!("\"{}\" {}", f.column, f.column_type.ddl_type()))
            .collect();
        if designated.is_none() {
            columns.push(format!("\"{IMPLICIT_TIMESTAMP}\" timestamp"));
        }

        let mut out = format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" ( {} ) ",
            self.table_name(),
            columns.join(", ")
        );

        let indexes: Vec<String> = self
            .index_fields()
            .map(|f| format!("index({})", f.column))
            .collect();
        if !indexes.is_empty() {
            out.push_str(&format!(", {} ", indexes.join(", ")));
        }

        out.push_str(&format!(
            "timestamp({}) ",
            designated.unwrap_or(IMPLICIT_TIMESTAMP)
        ));
        if let Some(options) = self.table_options() {
            out.push_str(&options.to_string());
        }
        out.push(';');
        out
    }
}
