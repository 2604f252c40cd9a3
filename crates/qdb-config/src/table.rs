//! Table-creation options.
//!
//! Records may supply these through their table-options capability; they are
//! appended to the create-table statement after the designated timestamp
//! clause.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validate::{is_valid_commit_lag, ConfigError};

/// Partitioning strategy for a new table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartitionBy {
    None,
    Year,
    Month,
    Day,
}

impl PartitionBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartitionBy::None => "NONE",
            PartitionBy::Year => "YEAR",
            PartitionBy::Month => "MONTH",
            PartitionBy::Day => "DAY",
        }
    }
}

impl fmt::Display for PartitionBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for `CREATE TABLE`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOptions {
    #[serde(default)]
    pub partition_by: Option<PartitionBy>,

    /// Zero leaves the store default in place.
    #[serde(default)]
    pub max_uncommitted_rows: u64,

    /// Duration literal such as `240s` or `500ms`. Empty leaves the store
    /// default in place.
    #[serde(default)]
    pub commit_lag: String,
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partition_by(mut self, partition: PartitionBy) -> Self {
        self.partition_by = Some(partition);
        self
    }

    pub fn max_uncommitted_rows(mut self, rows: u64) -> Self {
        self.max_uncommitted_rows = rows;
        self
    }

    pub fn commit_lag(mut self, lag: impl Into<String>) -> Self {
        self.commit_lag = lag.into();
        self
    }

    /// Check the commit lag literal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.commit_lag.is_empty() && !is_valid_commit_lag(&self.commit_lag) {
            return Err(ConfigError::Invalid {
                issues: vec![format!(
                    "commit_lag '{}' must be a duration such as 240s or 500ms",
                    self.commit_lag
                )],
            });
        }
        Ok(())
    }

    /// Whether rendering would produce no clause at all.
    pub fn is_empty(&self) -> bool {
        self.partition_by.is_none() && self.max_uncommitted_rows == 0 && self.commit_lag.is_empty()
    }
}

/// Renders the clause appended to the create-table statement. Each part keeps
/// a trailing space so the statement terminator can follow directly.
impl fmt::Display for TableOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(partition) = self.partition_by {
            write!(f, "PARTITION BY {partition} ")?;
        }

        let has_rows = self.max_uncommitted_rows != 0;
        let has_lag = !self.commit_lag.is_empty();
        if has_rows || has_lag {
            f.write_str("WITH ")?;
        }
        if has_rows {
            write!(f, "maxUncommittedRows={} ", self.max_uncommitted_rows)?;
        }
        if has_lag {
            if has_rows {
                f.write_str(", ")?;
            }
            write!(f, "commitLag={} ", self.commit_lag)?;
        }
        Ok(())
    }
}
