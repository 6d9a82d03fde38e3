//! Declaration checks for commands.
//!
//! Catches construction bugs such as duplicate parameter names, a repeated
//! positional that is not last, or malformed flag and child names. The
//! `with_*` methods on [`Command`](crate::Command) panic on the first
//! problem; the `try_with_*` variants return it.
//!
//! # Examples
//!
//! ```
//! use star_core::*;
//!
//! let cmd = Command::new(|_| Ok(())).with_positional(Param::string("name"));
//! let err = cmd.try_with_flag(Param::string("name")).unwrap_err();
//! assert_eq!(err, DeclarationError::SharedName("name".to_string()));
//! ```

use thiserror::Error;

use crate::param::AnyParam;
use crate::parse::FLAG_PREFIX;

/// Problems in a command declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// A parameter was declared with an empty or whitespace-only name.
    #[error("parameter name cannot be empty")]
    EmptyParamName,
    /// Flag names are given without the leading `--` and cannot contain `=`
    /// or whitespace.
    #[error("invalid flag name: {0:?}")]
    InvalidFlagName(String),
    /// Two flags of one command share a name.
    #[error("duplicate flag: {0}")]
    DuplicateFlag(String),
    /// Two positionals of one command share a name.
    #[error("duplicate positional: {0}")]
    DuplicatePositional(String),
    /// A flag and a positional of one command share a name. Both bind into
    /// the same slot, so this is rejected too.
    #[error("name used by both a flag and a positional: {0}")]
    SharedName(String),
    /// A positional was declared after a repeated one.
    #[error("positional {positional:?} declared after repeated positional {repeated:?}")]
    PositionalAfterRepeated { repeated: String, positional: String },
    /// A child name is empty, looks like a flag, or contains whitespace.
    #[error("invalid sub-command name: {0:?}")]
    InvalidChildName(String),
    /// Two children of one directory share a name.
    #[error("duplicate sub-command: {0}")]
    DuplicateChild(String),
    /// A display group lists a child the directory does not have.
    #[error("display group {group:?} lists unknown sub-command {child:?}")]
    UnknownGroupMember { group: String, child: String },
}

/// Checks that `flag` can be added next to `existing` flags.
pub fn check_flag(
    existing: &[std::sync::Arc<dyn AnyParam>],
    flag: &dyn AnyParam,
) -> Result<(), DeclarationError> {
    let name = flag.name();
    if name.trim().is_empty() {
        return Err(DeclarationError::EmptyParamName);
    }
    if name.starts_with('-') || name.contains('=') || name.chars().any(char::is_whitespace) {
        return Err(DeclarationError::InvalidFlagName(name.to_string()));
    }
    if existing.iter().any(|f| f.name() == name) {
        return Err(DeclarationError::DuplicateFlag(name.to_string()));
    }
    Ok(())
}

/// Checks that `positional` can be appended after `existing` positionals.
pub fn check_positional(
    existing: &[std::sync::Arc<dyn AnyParam>],
    positional: &dyn AnyParam,
) -> Result<(), DeclarationError> {
    let name = positional.name();
    if name.trim().is_empty() {
        return Err(DeclarationError::EmptyParamName);
    }
    if existing.iter().any(|p| p.name() == name) {
        return Err(DeclarationError::DuplicatePositional(name.to_string()));
    }
    if let Some(repeated) = existing.iter().find(|p| p.arity().is_repeated()) {
        return Err(DeclarationError::PositionalAfterRepeated {
            repeated: repeated.name().to_string(),
            positional: name.to_string(),
        });
    }
    Ok(())
}

/// Checks that none of `others` shares its name with `param`.
pub fn check_shared_name(
    others: &[std::sync::Arc<dyn AnyParam>],
    param: &dyn AnyParam,
) -> Result<(), DeclarationError> {
    if others.iter().any(|p| p.name() == param.name()) {
        return Err(DeclarationError::SharedName(param.name().to_string()));
    }
    Ok(())
}

/// Checks that `name` is usable as a sub-command name.
pub fn check_child_name(name: &str) -> Result<(), DeclarationError> {
    if name.is_empty() || name.starts_with(FLAG_PREFIX) || name.chars().any(char::is_whitespace)
    {
        return Err(DeclarationError::InvalidChildName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::param::Param;
    use crate::parsers::parse_string;

    #[test]
    fn test_check_flag_rejects_bad_names() {
        let none: Vec<Arc<dyn AnyParam>> = Vec::new();
        assert_eq!(
            check_flag(&none, &Param::string("--name")),
            Err(DeclarationError::InvalidFlagName("--name".to_string()))
        );
        assert_eq!(
            check_flag(&none, &Param::string("a=b")),
            Err(DeclarationError::InvalidFlagName("a=b".to_string()))
        );
        assert_eq!(
            check_flag(&none, &Param::string(" ")),
            Err(DeclarationError::EmptyParamName)
        );
    }

    #[test]
    fn test_check_flag_rejects_duplicates() {
        let existing: Vec<Arc<dyn AnyParam>> = vec![Arc::new(Param::string("name"))];
        assert_eq!(
            check_flag(&existing, &Param::optional("name", parse_string)),
            Err(DeclarationError::DuplicateFlag("name".to_string()))
        );
    }

    #[test]
    fn test_check_positional_rejects_after_repeated() {
        let existing: Vec<Arc<dyn AnyParam>> =
            vec![Arc::new(Param::repeated("files", parse_string))];

        assert_eq!(
            check_positional(&existing, &Param::string("dest")),
            Err(DeclarationError::PositionalAfterRepeated {
                repeated: "files".to_string(),
                positional: "dest".to_string(),
            })
        );
        assert!(matches!(
            check_positional(&existing, &Param::repeated("more", parse_string)),
            Err(DeclarationError::PositionalAfterRepeated { .. })
        ));
    }

    #[test]
    fn test_check_child_name() {
        assert!(check_child_name("create").is_ok());
        assert!(check_child_name("").is_err());
        assert!(check_child_name("--create").is_err());
        assert!(check_child_name("two words").is_err());
    }
}
