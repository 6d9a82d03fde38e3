//! Error types for argument binding and command execution.
//!
//! [`Error`] covers everything that can go wrong while turning an argument
//! vector into bound values or while resolving a sub-command. Command bodies
//! return [`BoxError`], so callers of [`run`](crate::run) receive parse
//! errors boxed and can recover them with `downcast_ref::<Error>()`.

use thiserror::Error;

/// Boxed error returned by command bodies and parameter parsers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while binding arguments or dispatching sub-commands.
#[derive(Debug, Error)]
pub enum Error {
    /// A declared flag was the last token, with no value after it.
    #[error("arg named but not provided for {0:?}")]
    FlagValueMissing(String),

    /// A flag with a non-zero minimum was never given and has no default.
    #[error("missing flag {0:?}")]
    MissingFlag(String),

    /// The argument vector ran out before a positional was satisfied.
    #[error("no args left to parse for positional argument {0:?}")]
    MissingPositional(String),

    /// Fewer values were bound than the parameter's minimum.
    #[error("missing value for parameter {0:?}")]
    MissingValue(String),

    /// More values were bound than a non-repeated parameter allows.
    #[error("multiple values provided for parameter {0:?}")]
    MultipleValues(String),

    /// A parameter's parser rejected a token.
    #[error("parsing {param:?} from {token:?}: {source}")]
    Conversion {
        param: String,
        token: String,
        #[source]
        source: BoxError,
    },

    /// A directory command was asked for a child it does not have.
    #[error("no command found for {0:?}")]
    NoSuchCommand(String),
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// An error that asks the process to exit with a specific code.
///
/// Command bodies return this when a failure should map to something other
/// than exit status 1. The message is that of the wrapped error.
///
/// # Examples
///
/// ```
/// use star_core::ExitError;
///
/// let err = ExitError::new(3, "nothing to do");
/// assert_eq!(err.exit_code(), 3);
/// assert_eq!(err.to_string(), "nothing to do");
/// ```
#[derive(Debug, Error)]
#[error("{source}")]
pub struct ExitError {
    code: i32,
    #[source]
    source: BoxError,
}

impl ExitError {
    /// Wraps `source` with an exit code.
    pub fn new(code: i32, source: impl Into<BoxError>) -> Self {
        Self {
            code,
            source: source.into(),
        }
    }

    /// Returns the exit code the process should terminate with.
    pub fn exit_code(&self) -> i32 {
        self.code
    }
}
