//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use qdb_common::{Error, Result};
use qdb_config::{LogFormat, LoggingConfig};

/// Build the filter from the configured level and extra directives. A
/// `RUST_LOG` value in the environment takes precedence.
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directives = config.filter_directives();
    EnvFilter::try_new(&directives)
        .map_err(|e| Error::Config(format!("invalid tracing filter '{directives}': {e}")))
}

/// Install a global fmt subscriber. Calling this when a subscriber is already
/// installed is not an error; the existing one stays in place.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = build_env_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    match installed {
        Ok(()) => tracing::trace!(
            level = %config.level,
            format = ?config.format,
            "logging initialized"
        ),
        Err(e) => tracing::debug!(error = %e, "subscriber already installed"),
    }
    Ok(())
}
