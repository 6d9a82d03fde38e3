//! Ready-made token parsers for common value types.

use std::convert::Infallible;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Rejected tokens for the parsers in this module that have no standard
/// error type of their own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("{0:?} is not a boolean (expected true/false, yes/no, on/off or 1/0)")]
    InvalidBool(String),
}

/// Identity parser for strings. Never fails.
pub fn parse_string(token: &str) -> Result<String, Infallible> {
    Ok(token.to_string())
}

/// Parses any [`FromStr`] type: integers, floats, addresses and so on.
///
/// # Examples
///
/// ```
/// use star_core::parse_from_str;
///
/// assert_eq!(parse_from_str::<i64>("-7").unwrap(), -7);
/// assert!(parse_from_str::<u8>("300").is_err());
/// ```
pub fn parse_from_str<T: FromStr>(token: &str) -> Result<T, T::Err> {
    token.parse()
}

/// Parses a boolean, accepting `true/false`, `yes/no`, `on/off` and `1/0`
/// in any letter case.
pub fn parse_bool(token: &str) -> Result<bool, ValueError> {
    match token.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ValueError::InvalidBool(token.to_string())),
    }
}

/// Parses a filesystem path. Never fails; existence is not checked.
pub fn parse_path(token: &str) -> Result<PathBuf, Infallible> {
    Ok(PathBuf::from(token))
}

/// Parses a human-readable duration such as `1h30m`, `250ms` or `2days`.
pub fn parse_duration(token: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(token)
}
