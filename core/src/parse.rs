//! The binding engine: flag extraction, positional consumption and the
//! multiplicity check.
//!
//! [`bind`] runs the three passes in order. Flags are extracted first so
//! that the positional pass only ever sees tokens no declared flag claimed.
//! A `--name` token that no declared flag matches is left in place; it is
//! meant for a child command further down the tree.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use star_core::{AnyParam, Param, bind, parse_from_str, parse_string};
//!
//! let flags: Vec<Arc<dyn AnyParam>> =
//!     vec![Arc::new(Param::repeated("set-ints", parse_from_str::<i64>))];
//! let positionals: Vec<Arc<dyn AnyParam>> = vec![Arc::new(Param::string("name"))];
//!
//! let args = ["--set-ints", "3", "alice", "--set-ints", "9", "more"];
//! let binding = bind(&flags, &positionals, &args.map(String::from)).unwrap();
//!
//! assert_eq!(binding.values.typed::<i64>("set-ints"), Some(vec![3, 9]));
//! assert_eq!(binding.values.typed::<String>("name"), Some(vec!["alice".to_string()]));
//! assert_eq!(binding.extra, vec!["more".to_string()]);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::param::{AnyParam, Value};

/// Prefix that marks a token as a flag.
pub const FLAG_PREFIX: &str = "--";

/// Returns `true` if `token` looks like a flag.
pub fn is_flag(token: &str) -> bool {
    token.starts_with(FLAG_PREFIX)
}

/// Bound values keyed by parameter name, in input order per name.
#[derive(Default)]
pub struct Values {
    map: HashMap<String, Vec<Value>>,
}

impl Values {
    /// Creates an empty binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value for `name`.
    pub fn push(&mut self, name: &str, value: Value) {
        self.map.entry(name.to_string()).or_default().push(value);
    }

    /// Values bound to `name`; empty if none were.
    pub fn get(&self, name: &str) -> &[Value] {
        self.map.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of values bound to `name`.
    pub fn count(&self, name: &str) -> usize {
        self.get(name).len()
    }

    /// Returns `true` if at least one value is bound to `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.count(name) > 0
    }

    /// Clones the values bound to `name` as `T`.
    ///
    /// Returns `None` when nothing is bound or when a value is not a `T`.
    pub fn typed<T: Clone + 'static>(&self, name: &str) -> Option<Vec<T>> {
        let values = self.map.get(name)?;
        values
            .iter()
            .map(|value| value.downcast_ref::<T>().cloned())
            .collect()
    }

    /// Names with at least one value, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .map
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Values {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.names().into_iter().map(|n| (n, self.count(n))))
            .finish()
    }
}

/// Result of a successful [`bind`].
#[derive(Debug, Default)]
pub struct Binding {
    /// Values for every declared flag and positional.
    pub values: Values,
    /// Tokens no declared parameter claimed, in input order.
    pub extra: Vec<String>,
}

/// Binds `args` against declared flags and positionals.
///
/// Runs [`parse_flags`], then [`parse_positionals`] over the residual, then
/// [`check_values`]. The first error aborts the whole binding.
pub fn bind(
    flags: &[Arc<dyn AnyParam>],
    positionals: &[Arc<dyn AnyParam>],
    args: &[String],
) -> Result<Binding> {
    let mut values = Values::new();
    let residual = parse_flags(&mut values, flags, args)?;
    let extra = parse_positionals(&mut values, positionals, residual)?;
    check_values(&values, flags, positionals)?;
    Ok(Binding { values, extra })
}

/// Extracts declared `--name value` pairs from `args` into `dst`.
///
/// Returns the remaining tokens in their original order. Undeclared flags
/// and bare tokens pass through. After the scan, declared flags that were
/// never given receive their default, in declaration order; a flag with a
/// non-zero minimum and no default yields [`Error::MissingFlag`].
///
/// `--name=value` is not supported: such a token never matches a declared
/// flag and passes through as if it were undeclared.
pub fn parse_flags(
    dst: &mut Values,
    flags: &[Arc<dyn AnyParam>],
    args: &[String],
) -> Result<Vec<String>> {
    let index: HashMap<&str, &dyn AnyParam> =
        flags.iter().map(|f| (f.name(), f.as_ref())).collect();

    let mut rest = Vec::with_capacity(args.len());
    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        if let Some(name) = arg.strip_prefix(FLAG_PREFIX) {
            if let Some(param) = index.get(name) {
                let Some(token) = args.get(i + 1) else {
                    return Err(Error::FlagValueMissing(name.to_string()));
                };
                let value = param.parse_value(token)?;
                debug!(flag = name, token = %token, "bound flag");
                dst.push(name, value);
                i += 2;
                continue;
            }
            if name.contains('=') {
                warn!(token = %arg, "--name=value is not supported, passing token through");
            }
        }
        rest.push(arg.clone());
        i += 1;
    }

    for flag in flags {
        if dst.contains(flag.name()) {
            continue;
        }
        if let Some(default) = flag.make_default() {
            debug!(flag = flag.name(), "using default for flag");
            dst.push(flag.name(), default?);
        } else if flag.arity().min_count() > 0 {
            return Err(Error::MissingFlag(flag.name().to_string()));
        }
    }

    Ok(rest)
}

/// Consumes positional values from `args` in declaration order.
///
/// Each positional takes tokens from the front, up to its maximum count.
/// Flag-like tokens are skipped together with the token after them, which
/// is taken to be their value; both stay in the output. A `--name=value`
/// token is skipped on its own. When the input runs
/// out, a positional with nothing bound falls back to its default, and one
/// still below its minimum yields [`Error::MissingPositional`].
///
/// Returns the unclaimed tokens, in order.
pub fn parse_positionals(
    dst: &mut Values,
    positionals: &[Arc<dyn AnyParam>],
    args: Vec<String>,
) -> Result<Vec<String>> {
    let mut args = args;
    for param in positionals {
        let arity = param.arity();
        let mut taken = 0;
        while arity.has_room(taken) {
            let Some(at) = first_bare_token(&args) else {
                break;
            };
            let token = args.remove(at);
            let value = param.parse_value(&token)?;
            debug!(positional = param.name(), token = %token, "bound positional");
            dst.push(param.name(), value);
            taken += 1;
        }

        if taken == 0 {
            if let Some(default) = param.make_default() {
                debug!(positional = param.name(), "using default for positional");
                dst.push(param.name(), default?);
                taken = 1;
            }
        }
        if taken < arity.min_count() {
            return Err(Error::MissingPositional(param.name().to_string()));
        }
    }
    Ok(args)
}

/// Checks every parameter's bound count against its arity.
///
/// Flags are checked before positionals, each in declaration order.
pub fn check_values(
    values: &Values,
    flags: &[Arc<dyn AnyParam>],
    positionals: &[Arc<dyn AnyParam>],
) -> Result<()> {
    for param in flags.iter().chain(positionals) {
        let count = values.count(param.name());
        let arity = param.arity();
        if count < arity.min_count() {
            return Err(Error::MissingValue(param.name().to_string()));
        }
        if arity.max_count().is_some_and(|max| count > max) {
            return Err(Error::MultipleValues(param.name().to_string()));
        }
    }
    Ok(())
}

/// Index of the first token that is neither a flag nor a flag's value.
///
/// A `--name=value` token carries its own value, so the token after it is
/// not skipped.
pub(crate) fn first_bare_token(args: &[String]) -> Option<usize> {
    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        if is_flag(arg) {
            i += if arg.contains('=') { 1 } else { 2 };
            continue;
        }
        return Some(i);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::Param;
    use crate::parsers::{parse_from_str, parse_string};

    fn args(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|x| x.to_string()).collect()
    }

    fn params(xs: Vec<Arc<dyn AnyParam>>) -> Vec<Arc<dyn AnyParam>> {
        xs
    }

    #[test]
    fn test_parse_flags_single() {
        let flags = params(vec![Arc::new(Param::required(
            "set-int",
            parse_from_str::<i32>,
        ))]);
        let mut dst = Values::new();

        let rest = parse_flags(&mut dst, &flags, &args(&["--set-int", "117", "extra", "stuff"]))
            .unwrap();

        assert_eq!(dst.typed::<i32>("set-int"), Some(vec![117]));
        assert_eq!(rest, args(&["extra", "stuff"]));
    }

    #[test]
    fn test_parse_flags_repeated_keeps_order_and_duplicates() {
        let flags = params(vec![Arc::new(Param::repeated(
            "set-ints",
            parse_from_str::<i32>,
        ))]);
        let mut dst = Values::new();

        let rest = parse_flags(
            &mut dst,
            &flags,
            &args(&[
                "--set-ints", "3", "--set-ints", "6", "--set-ints", "9", "--set-ints", "6", "a",
                "b",
            ]),
        )
        .unwrap();

        assert_eq!(dst.typed::<i32>("set-ints"), Some(vec![3, 6, 9, 6]));
        assert_eq!(rest, args(&["a", "b"]));
    }

    #[test]
    fn test_parse_flags_passes_unknown_flags_through() {
        let flags = params(vec![Arc::new(Param::optional("known", parse_string))]);
        let mut dst = Values::new();

        let rest = parse_flags(
            &mut dst,
            &flags,
            &args(&["child", "--other", "x", "--known", "k", "--name=v"]),
        )
        .unwrap();

        assert_eq!(dst.typed::<String>("known"), Some(vec!["k".to_string()]));
        assert_eq!(rest, args(&["child", "--other", "x", "--name=v"]));
    }

    #[test]
    fn test_parse_flags_value_missing() {
        let flags = params(vec![Arc::new(Param::string("name"))]);
        let mut dst = Values::new();

        let err = parse_flags(&mut dst, &flags, &args(&["--name"])).unwrap_err();
        assert!(matches!(err, Error::FlagValueMissing(ref n) if n == "name"));
        assert!(err.to_string().contains("arg named but not provided"));
    }

    #[test]
    fn test_parse_flags_defaults_every_absent_flag() {
        let flags = params(vec![
            Arc::new(Param::required("a", parse_string).with_default("x")),
            Arc::new(Param::required("b", parse_from_str::<u8>).with_default("2")),
            Arc::new(Param::optional("c", parse_string)),
        ]);
        let mut dst = Values::new();

        let rest = parse_flags(&mut dst, &flags, &[]).unwrap();

        assert!(rest.is_empty());
        assert_eq!(dst.typed::<String>("a"), Some(vec!["x".to_string()]));
        assert_eq!(dst.typed::<u8>("b"), Some(vec![2]));
        assert!(!dst.contains("c"));
    }

    #[test]
    fn test_parse_flags_missing_reports_first_in_declaration_order() {
        let flags = params(vec![
            Arc::new(Param::optional("opt", parse_string)),
            Arc::new(Param::string("zeta")),
            Arc::new(Param::string("alpha")),
        ]);
        let mut dst = Values::new();

        let err = parse_flags(&mut dst, &flags, &[]).unwrap_err();
        assert!(matches!(err, Error::MissingFlag(ref n) if n == "zeta"));
    }

    #[test]
    fn test_parse_flags_conversion_error() {
        let flags = params(vec![Arc::new(Param::required(
            "n",
            parse_from_str::<u32>,
        ))]);
        let mut dst = Values::new();

        let err = parse_flags(&mut dst, &flags, &args(&["--n", "ten"])).unwrap_err();
        assert!(matches!(
            err,
            Error::Conversion { ref param, ref token, .. } if param == "n" && token == "ten"
        ));
    }

    #[test]
    fn test_parse_positionals_required_then_repeated() {
        let pos = params(vec![
            Arc::new(Param::string("must-have")),
            Arc::new(Param::repeated("xs", parse_string)),
        ]);
        let mut dst = Values::new();

        let rest = parse_positionals(&mut dst, &pos, args(&["1", "a", "b", "c"])).unwrap();

        assert!(rest.is_empty());
        assert_eq!(dst.typed::<String>("must-have"), Some(vec!["1".to_string()]));
        assert_eq!(
            dst.typed::<String>("xs"),
            Some(args(&["a", "b", "c"]))
        );
    }

    #[test]
    fn test_parse_positionals_repeated_may_be_empty() {
        let pos = params(vec![
            Arc::new(Param::string("must-have")),
            Arc::new(Param::repeated("xs", parse_string)),
        ]);
        let mut dst = Values::new();

        let rest = parse_positionals(&mut dst, &pos, args(&["1"])).unwrap();

        assert!(rest.is_empty());
        assert_eq!(dst.typed::<String>("must-have"), Some(vec!["1".to_string()]));
        assert!(!dst.contains("xs"));
    }

    #[test]
    fn test_parse_positionals_default() {
        let pos = params(vec![Arc::new(
            Param::string("has-default").with_default("default-value"),
        )]);
        let mut dst = Values::new();

        let rest = parse_positionals(&mut dst, &pos, Vec::new()).unwrap();

        assert!(rest.is_empty());
        assert_eq!(
            dst.typed::<String>("has-default"),
            Some(vec!["default-value".to_string()])
        );
    }

    #[test]
    fn test_parse_positionals_missing_required() {
        let pos = params(vec![
            Arc::new(Param::string("src")),
            Arc::new(Param::string("dst")),
        ]);
        let mut dst = Values::new();

        let err = parse_positionals(&mut dst, &pos, args(&["only-one"])).unwrap_err();
        assert!(matches!(err, Error::MissingPositional(ref n) if n == "dst"));
    }

    #[test]
    fn test_parse_positionals_repeated_below_minimum() {
        let pos = params(vec![Arc::new(
            Param::repeated("files", parse_string).with_min(2),
        )]);
        let mut dst = Values::new();

        let err = parse_positionals(&mut dst, &pos, args(&["a.txt"])).unwrap_err();
        assert!(matches!(err, Error::MissingPositional(ref n) if n == "files"));
    }

    #[test]
    fn test_parse_positionals_skips_flag_and_its_value() {
        let pos = params(vec![Arc::new(Param::string("id"))]);
        let mut dst = Values::new();

        let rest =
            parse_positionals(&mut dst, &pos, args(&["--child-flag", "v", "abc", "tail"])).unwrap();

        assert_eq!(dst.typed::<String>("id"), Some(vec!["abc".to_string()]));
        assert_eq!(rest, args(&["--child-flag", "v", "tail"]));
    }

    #[test]
    fn test_check_values_rejects_duplicates() {
        let flags = params(vec![Arc::new(Param::string("name"))]);
        let err = bind(&flags, &[], &args(&["--name", "a", "--name", "b"])).unwrap_err();
        assert!(matches!(err, Error::MultipleValues(ref n) if n == "name"));
    }

    #[test]
    fn test_check_values_rejects_short_repeated_flag() {
        let flags = params(vec![Arc::new(
            Param::repeated("tag", parse_string).with_min(2),
        )]);
        let err = bind(&flags, &[], &args(&["--tag", "a"])).unwrap_err();
        assert!(matches!(err, Error::MissingValue(ref n) if n == "tag"));
    }

    #[test]
    fn test_bind_required_and_optional_positionals() {
        let pos = params(vec![
            Arc::new(Param::string("arg1")),
            Arc::new(Param::optional("arg2", parse_string)),
        ]);

        let binding = bind(&[], &pos, &args(&["x"])).unwrap();

        assert_eq!(binding.values.names(), vec!["arg1"]);
        assert_eq!(binding.values.typed::<String>("arg1"), Some(vec!["x".to_string()]));
        assert!(binding.extra.is_empty());
    }

    #[test]
    fn test_bind_leaves_extra_tokens() {
        let flags = params(vec![Arc::new(Param::repeated(
            "set-ints",
            parse_from_str::<i64>,
        ))]);

        let binding = bind(
            &flags,
            &[],
            &args(&["--set-ints", "3", "--set-ints", "6", "--set-ints", "9", "a", "b"]),
        )
        .unwrap();

        assert_eq!(binding.values.typed::<i64>("set-ints"), Some(vec![3, 6, 9]));
        assert_eq!(binding.extra, args(&["a", "b"]));
    }

    #[test]
    fn test_first_bare_token() {
        assert_eq!(first_bare_token(&args(&["--a", "1", "x"])), Some(2));
        assert_eq!(first_bare_token(&args(&["--a", "1"])), None);
        assert_eq!(first_bare_token(&args(&["--a"])), None);
        assert_eq!(first_bare_token(&args(&[])), None);
        assert_eq!(first_bare_token(&args(&["--a=1", "x"])), Some(1));
    }

    #[test]
    fn test_bind_equals_flag_does_not_swallow_positional() {
        let pos = params(vec![Arc::new(Param::string("file"))]);

        let binding = bind(&[], &pos, &args(&["--mode=fast", "input.txt"])).unwrap();

        assert_eq!(
            binding.values.typed::<String>("file"),
            Some(vec!["input.txt".to_string()])
        );
        assert_eq!(binding.extra, args(&["--mode=fast"]));
    }
}
