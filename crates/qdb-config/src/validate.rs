//! Configuration errors and semantic validation helpers.

use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use thiserror::Error;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("failed to parse {format} config: {message}")]
    Parse { format: String, message: String },

    #[error("invalid configuration: {}", issues.join("; "))]
    Invalid { issues: Vec<String> },
}

static COMMIT_LAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(us|ms|s|m|h|d)$").expect("regex"));

/// Whether `lag` is a duration literal the store accepts for `commitLag`.
pub fn is_valid_commit_lag(lag: &str) -> bool {
    COMMIT_LAG_RE.is_match(lag)
}

/// Whether `addr` looks like `host:port` with a numeric port.
pub fn is_valid_host_port(addr: &str) -> bool {
    match addr.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && port.parse::<u16>().is_ok(),
        None => false,
    }
}
