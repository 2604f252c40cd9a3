//! Loading configuration from TOML or JSON files.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::validate::ConfigError;
use crate::Config;

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Toml => "toml",
            Self::Json => "json",
        }
    }

    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat { extension: ext }),
        }
    }
}

/// Load and validate configuration from a file path.
pub fn load_config_from_path(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let format = ConfigFormat::from_path(path)?;
    let config = parse_config_str(&content, format)?;
    debug!(path = %path.display(), format = format.as_str(), "config loaded");
    Ok(config)
}

/// Parse and validate configuration from a string.
pub fn parse_config_str(content: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
    let config: Config = match format {
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| ConfigError::Parse {
            format: format.as_str().to_string(),
            message: e.to_string(),
        })?,
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            format: format.as_str().to_string(),
            message: e.to_string(),
        })?,
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogFormat;
    use std::io::Write;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = parse_config_str("", ConfigFormat::Toml).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn toml_sections_override_defaults() {
        let toml = r#"
            [client]
            ilp_host = "db.internal:9009"

            [writer]
            batch_size = 50
            table_name = "events"

            [logging]
            level = "debug"
            format = "json"
        "#;
        let config = parse_config_str(toml, ConfigFormat::Toml).unwrap();
        assert_eq!(config.client.ilp_host, "db.internal:9009");
        assert_eq!(config.writer.batch_size, 50);
        assert_eq!(config.writer.table_name.as_deref(), Some("events"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.client.pg_conn_str.contains("8812"));
    }

    #[test]
    fn json_config_is_validated() {
        let json = r#"{"writer": {"batch_size": 0}}"#;
        let err = parse_config_str(json, ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = parse_config_str("[client", ConfigFormat::Toml).unwrap_err();
        match err {
            ConfigError::Parse { format, .. } => assert_eq!(format, "toml"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_from_file_detects_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qdb.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{"client": {{"ilp_host": "127.0.0.1:9009"}}}}"#).unwrap();

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.client.ilp_host, "127.0.0.1:9009");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qdb.yaml");
        fs::write(&path, "client: {}").unwrap();
        let err = load_config_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config_from_path(Path::new("/nonexistent/qdb.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
