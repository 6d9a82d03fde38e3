//! Parameter declarations.
//!
//! A [`Param<T>`] pairs a name and an [`Arity`] with a parser that turns one
//! argument token into a `T`. The same value is used to declare the
//! parameter on a [`Command`](crate::Command) and to load the typed value
//! from the [`Context`] inside the command body.
//!
//! # Examples
//!
//! ```
//! use star_core::{Arity, Param, parse_from_str};
//!
//! let count = Param::required("count", parse_from_str::<u32>)
//!     .with_short_doc("how many items to fetch")
//!     .with_default("10");
//!
//! assert_eq!(count.name(), "count");
//! assert_eq!(count.arity(), Arity::Required);
//! assert_eq!(count.default_string(), Some("10"));
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::error::{BoxError, Error, Result};
use crate::parsers::parse_string;

/// A bound value with its concrete type erased.
pub type Value = Box<dyn Any + Send + Sync>;

/// Converts one argument token into a typed value.
pub type Parser<T> = Arc<dyn Fn(&str) -> std::result::Result<T, BoxError> + Send + Sync>;

/// How many times a parameter may be bound.
///
/// # Examples
///
/// ```
/// use star_core::Arity;
///
/// assert_eq!(Arity::Required.min_count(), 1);
/// assert_eq!(Arity::Optional.max_count(), Some(1));
/// assert_eq!(Arity::Repeated { min: 2 }.min_count(), 2);
/// assert_eq!(Arity::Repeated { min: 0 }.max_count(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// Exactly one value.
    Required,
    /// Zero or one value.
    Optional,
    /// Any number of values, at least `min`.
    Repeated { min: usize },
}

impl Arity {
    /// Minimum number of values a successful parse binds.
    pub fn min_count(self) -> usize {
        match self {
            Arity::Required => 1,
            Arity::Optional => 0,
            Arity::Repeated { min } => min,
        }
    }

    /// Maximum number of values, `None` when unbounded.
    pub fn max_count(self) -> Option<usize> {
        match self {
            Arity::Required | Arity::Optional => Some(1),
            Arity::Repeated { .. } => None,
        }
    }

    /// Returns `true` for [`Arity::Repeated`].
    pub fn is_repeated(self) -> bool {
        matches!(self, Arity::Repeated { .. })
    }

    /// Returns `true` if one more value can be bound after `count`.
    pub fn has_room(self, count: usize) -> bool {
        self.max_count().is_none_or(|max| count < max)
    }
}

/// The type-erased view of a parameter used by the binding engine.
///
/// Implemented by [`Param<T>`]; commands store their flags and positionals
/// as `Arc<dyn AnyParam>`.
pub trait AnyParam: Send + Sync {
    /// Name, unique among the command's flags or among its positionals.
    fn name(&self) -> &str;

    /// Occurrence bounds.
    fn arity(&self) -> Arity;

    /// One-line description shown in usage text.
    fn short_doc(&self) -> &str;

    /// The default in string form, run through the parser when needed.
    fn default_string(&self) -> Option<&str>;

    /// Parses one token, attaching the parameter name and token on failure.
    fn parse_value(&self, token: &str) -> Result<Value>;

    /// Returns `true` if the parameter declares a default.
    fn has_default(&self) -> bool {
        self.default_string().is_some()
    }

    /// Produces the default value through the same path as explicit input.
    fn make_default(&self) -> Option<Result<Value>> {
        self.default_string().map(|raw| self.parse_value(raw))
    }
}

/// A typed parameter declaration.
///
/// Cloning is cheap; the parser is shared.
pub struct Param<T> {
    name: String,
    arity: Arity,
    default: Option<String>,
    short_doc: String,
    parse: Parser<T>,
}

impl<T> Clone for Param<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            arity: self.arity,
            default: self.default.clone(),
            short_doc: self.short_doc.clone(),
            parse: Arc::clone(&self.parse),
        }
    }
}

impl<T> fmt::Debug for Param<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("default", &self.default)
            .field("short_doc", &self.short_doc)
            .finish_non_exhaustive()
    }
}

impl<T: Send + Sync + 'static> Param<T> {
    /// Declares a parameter with an explicit arity.
    pub fn new<F, E>(name: impl Into<String>, arity: Arity, parse: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self {
            name: name.into(),
            arity,
            default: None,
            short_doc: String::new(),
            parse: Arc::new(move |token: &str| parse(token).map_err(Into::into)),
        }
    }

    /// Declares a parameter that must be bound exactly once.
    pub fn required<F, E>(name: impl Into<String>, parse: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self::new(name, Arity::Required, parse)
    }

    /// Declares a parameter that may be bound once or not at all.
    pub fn optional<F, E>(name: impl Into<String>, parse: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self::new(name, Arity::Optional, parse)
    }

    /// Declares a parameter that may be bound any number of times.
    pub fn repeated<F, E>(name: impl Into<String>, parse: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self::new(name, Arity::Repeated { min: 0 }, parse)
    }

    /// Sets the default, given as the string the parser would receive.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets the one-line description.
    pub fn with_short_doc(mut self, doc: impl Into<String>) -> Self {
        self.short_doc = doc.into();
        self
    }

    /// Sets the minimum count of a repeated parameter.
    ///
    /// # Panics
    ///
    /// Panics if the parameter is not repeated.
    pub fn with_min(mut self, min: usize) -> Self {
        match self.arity {
            Arity::Repeated { .. } => self.arity = Arity::Repeated { min },
            other => panic!(
                "with_min on non-repeated param {:?} ({other:?})",
                self.name
            ),
        }
        self
    }

    /// Name of the parameter.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arity of the parameter.
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Default in string form, if any.
    pub fn default_string(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Runs the parser on `token`.
    pub fn parse(&self, token: &str) -> std::result::Result<T, BoxError> {
        (self.parse)(token)
    }
}

impl Param<String> {
    /// Declares a required string parameter.
    pub fn string(name: impl Into<String>) -> Self {
        Self::required(name, parse_string)
    }
}

impl<T: Clone + Send + Sync + 'static> Param<T> {
    /// Loads the single value bound to this parameter.
    ///
    /// # Panics
    ///
    /// Panics if the running command does not declare this parameter, if the
    /// parameter is repeated, or if it is optional without a default and was
    /// not given (use [`load_opt`](Self::load_opt) for those).
    pub fn load(&self, ctx: &Context<'_>) -> T {
        if self.arity.is_repeated() {
            panic!("load on repeated param {:?}, use load_all", self.name);
        }
        let values = ctx.values_for(&self.name);
        match values.last() {
            Some(value) => downcast(&self.name, value),
            None => panic!("no value bound for param {:?}, use load_opt", self.name),
        }
    }

    /// Loads the value of an optional parameter.
    ///
    /// # Panics
    ///
    /// Panics if the running command does not declare this parameter or if
    /// the parameter is required or repeated.
    pub fn load_opt(&self, ctx: &Context<'_>) -> Option<T> {
        match self.arity {
            Arity::Required => panic!("load_opt on required param {:?}", self.name),
            Arity::Repeated { .. } => {
                panic!("load_opt on repeated param {:?}, use load_all", self.name)
            }
            Arity::Optional => {}
        }
        ctx.values_for(&self.name)
            .last()
            .map(|value| downcast(&self.name, value))
    }

    /// Loads every value bound to a repeated parameter, in input order.
    ///
    /// # Panics
    ///
    /// Panics if the running command does not declare this parameter or if
    /// the parameter is not repeated.
    pub fn load_all(&self, ctx: &Context<'_>) -> Vec<T> {
        if !self.arity.is_repeated() {
            panic!("load_all on non-repeated param {:?}", self.name);
        }
        ctx.values_for(&self.name)
            .iter()
            .map(|value| downcast(&self.name, value))
            .collect()
    }
}

impl<T: Send + Sync + 'static> AnyParam for Param<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> Arity {
        self.arity
    }

    fn short_doc(&self) -> &str {
        &self.short_doc
    }

    fn default_string(&self) -> Option<&str> {
        self.default.as_deref()
    }

    fn parse_value(&self, token: &str) -> Result<Value> {
        match (self.parse)(token) {
            Ok(value) => Ok(Box::new(value)),
            Err(source) => Err(Error::Conversion {
                param: self.name.clone(),
                token: token.to_string(),
                source,
            }),
        }
    }
}

fn downcast<T: Clone + 'static>(name: &str, value: &Value) -> T {
    match value.downcast_ref::<T>() {
        Some(v) => v.clone(),
        None => panic!(
            "param {name:?} holds a value of a different type than {}",
            std::any::type_name::<T>()
        ),
    }
}
