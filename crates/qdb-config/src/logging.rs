//! Logging settings.

use serde::{Deserialize, Serialize};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level directive (`error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,

    pub format: LogFormat,

    /// Extra `target=level` directives.
    pub directives: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            directives: Vec::new(),
        }
    }
}

const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

impl LoggingConfig {
    /// Filter string combining the level with the extra directives.
    pub fn filter_directives(&self) -> String {
        std::iter::once(self.level.as_str())
            .chain(self.directives.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub(crate) fn collect_issues(&self, issues: &mut Vec<String>) {
        if !LEVELS.contains(&self.level.to_ascii_lowercase().as_str()) {
            issues.push(format!("logging.level '{}' is not a level", self.level));
        }
        for directive in &self.directives {
            if !directive.contains('=') {
                issues.push(format!(
                    "logging.directives entry '{directive}' must be target=level"
                ));
            }
        }
    }
}
