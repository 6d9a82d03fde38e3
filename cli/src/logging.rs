//! Diagnostic logging setup.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::MainConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter {directive:?}: {source}")]
    InvalidFilter {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// Builds the filter: the variable named by `log_env` when it is set and
/// valid, otherwise `log_default`.
pub fn env_filter(config: &MainConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_env(&config.log_env) {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_default).map_err(|source| LoggingError::InvalidFilter {
        directive: config.log_default.clone(),
        source,
    })
}

/// Installs a stderr `fmt` subscriber as the global default.
///
/// Fails if another subscriber is already installed, which callers that
/// may initialize more than once can ignore.
pub fn init_logging(config: &MainConfig) -> Result<(), LoggingError> {
    let filter = env_filter(config)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))
}
