//! Batched line writer settings.

use serde::{Deserialize, Serialize};

/// Default number of lines buffered before a flush.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Settings for the batched line writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Lines buffered before the batch is written out.
    pub batch_size: usize,

    /// Flush the underlying stream after every batch write.
    pub flush_on_write: bool,

    /// Table name applied to every record instead of its own.
    pub table_name: Option<String>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            flush_on_write: true,
            table_name: None,
        }
    }
}

impl WriterConfig {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub(crate) fn collect_issues(&self, issues: &mut Vec<String>) {
        if self.batch_size == 0 {
            issues.push("writer.batch_size must be greater than 0".to_string());
        }
        if self.table_name.as_deref().is_some_and(|t| t.trim().is_empty()) {
            issues.push("writer.table_name must not be blank".to_string());
        }
    }
}
