//! Typed command-line parameters, argument binding and sub-command dispatch.
//!
//! This crate defines the pieces a command-line program is assembled from:
//!
//! - [`Param`]: a named, typed parameter with an [`Arity`] (required,
//!   optional or repeated), an optional default and a token parser.
//! - [`Command`]: ordered positionals, flags and a body; or a directory
//!   that dispatches to named children.
//! - [`bind`]: the binding engine: extracts `--name value` flags, consumes
//!   positionals in declaration order, applies defaults and checks every
//!   parameter's count against its arity.
//! - [`run`]: binds a command's arguments and runs its body with a
//!   [`Context`], recursing through directories.
//!
//! Declaration checks ([`DeclarationError`]) reject duplicate names and a
//! repeated positional that is not last. Usage text comes from
//! [`Command::doc`], and [`format_doc`] renders the same data as JSON or
//! YAML.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use star_core::*;
//!
//! let ints = Param::repeated("set-ints", parse_from_str::<i64>);
//! let cmd = Command::new({
//!     let ints = ints.clone();
//!     move |ctx| {
//!         let total: i64 = ints.load_all(ctx).iter().sum();
//!         writeln!(ctx.io.stdout, "{total} {:?}", ctx.extra)?;
//!         Ok(())
//!     }
//! })
//! .with_flag(ints);
//!
//! let args: Vec<String> = ["--set-ints", "3", "--set-ints", "6", "a", "b"]
//!     .map(String::from)
//!     .to_vec();
//! let (mut stdin, mut stdout, mut stderr) = (&b""[..], Vec::<u8>::new(), Vec::<u8>::new());
//! run(
//!     &CancellationToken::new(),
//!     &cmd,
//!     &BTreeMap::new(),
//!     "sum",
//!     &args,
//!     Io::new(&mut stdin, &mut stdout, &mut stderr),
//! )
//! .unwrap();
//! assert_eq!(String::from_utf8(stdout).unwrap(), "9 [\"a\", \"b\"]\n");
//! ```

mod command;
mod context;
mod dir;
mod error;
mod execute;
mod param;
mod parse;
mod parsers;
mod usage;
mod validate;

pub use command::{Body, Command, Group, Metadata};
pub use context::{Context, Env, Io};
pub use dir::write_listing;
pub use error::{BoxError, Error, ExitError, Result};
pub use execute::run;
pub use param::{AnyParam, Arity, Param, Parser, Value};
pub use parse::{
    Binding, FLAG_PREFIX, Values, bind, check_values, is_flag, parse_flags, parse_positionals,
};
pub use parsers::{
    ValueError, parse_bool, parse_duration, parse_from_str, parse_path, parse_string,
};
pub use tokio_util::sync::CancellationToken;
pub use usage::{ChildDoc, CommandDoc, DocFormat, ParamDoc, format_doc};
pub use validate::{
    DeclarationError, check_child_name, check_flag, check_positional, check_shared_name,
};
