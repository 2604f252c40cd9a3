//! Configuration loading and validation for the qdb record mapper.
//!
//! This crate provides:
//! - Typed Rust structs for client, writer, and logging settings
//! - Table-creation options rendered into DDL
//! - Loading from TOML or JSON files
//! - Semantic validation

pub mod client;
pub mod load;
pub mod logging;
pub mod table;
pub mod validate;
pub mod writer;

pub use client::ClientConfig;
pub use load::{load_config_from_path, parse_config_str, ConfigFormat};
pub use logging::{LogFormat, LoggingConfig};
pub use table::{PartitionBy, TableOptions};
pub use validate::ConfigError;
pub use writer::WriterConfig;

use serde::{Deserialize, Serialize};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Complete mapper configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub client: ClientConfig,
    pub writer: WriterConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Run semantic validation over every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut issues = Vec::new();
        self.client.collect_issues(&mut issues);
        self.writer.collect_issues(&mut issues);
        self.logging.collect_issues(&mut issues);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid { issues })
        }
    }
}
