//! Running `star_core` commands as programs.
//!
//! [`main`] is the usual entry point: it gathers the process arguments and
//! the prefixed environment, installs a `tracing` subscriber, runs the
//! command and turns the outcome into an exit status. [`run_main`] does the
//! same with explicit arguments and a [`MainConfig`].
//!
//! The [`testing`] module runs commands against in-memory streams.

mod config;
mod entry;
mod env;
mod exit;
mod logging;
pub mod testing;

pub use config::{DEFAULT_LOG_ENV, DEFAULT_LOG_FILTER, MainConfig};
pub use entry::{main, report, run_main};
pub use env::{default_env_prefix, filter_env, os_env};
pub use exit::{FAILURE, exit_code};
pub use logging::{LoggingError, env_filter, init_logging};
