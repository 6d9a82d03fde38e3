//! Entry point configuration.

use serde::{Deserialize, Serialize};

use crate::env::default_env_prefix;

/// Variable the log filter is read from unless configured otherwise.
pub const DEFAULT_LOG_ENV: &str = "STAR_LOG";

/// Filter directive used when the log variable is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// How [`crate::run_main`] prepares an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainConfig {
    /// Only environment variables starting with this prefix are passed to
    /// the command. `None` derives it from the program name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_prefix: Option<String>,
    pub log_env: String,
    pub log_default: String,
    pub init_logging: bool,
}

impl Default for MainConfig {
    fn default() -> Self {
        Self {
            env_prefix: None,
            log_env: DEFAULT_LOG_ENV.to_string(),
            log_default: DEFAULT_LOG_FILTER.to_string(),
            init_logging: true,
        }
    }
}

impl MainConfig {
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn with_log_env(mut self, var: impl Into<String>) -> Self {
        self.log_env = var.into();
        self
    }

    pub fn with_log_default(mut self, directive: impl Into<String>) -> Self {
        self.log_default = directive.into();
        self
    }

    pub fn with_init_logging(mut self, enabled: bool) -> Self {
        self.init_logging = enabled;
        self
    }

    /// The environment prefix used for a program called `name`.
    pub fn env_prefix_for(&self, name: &str) -> String {
        match &self.env_prefix {
            Some(prefix) => prefix.clone(),
            None => default_env_prefix(name),
        }
    }
}
