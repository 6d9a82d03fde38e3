//! Running commands: bind, then call the body.

use tokio_util::sync::CancellationToken;
use tracing::{debug, debug_span};

use crate::command::Command;
use crate::context::{Context, Env, Io};
use crate::error::BoxError;
use crate::parse::bind;

/// Runs `command` with `args` and flushes the output streams afterwards.
///
/// Arguments are bound first; on a binding error the command's usage text
/// is written to stderr and the error is returned without running the body.
/// Otherwise the body runs, and directory commands recurse into the
/// selected child. Streams are flushed exactly once, after everything
/// below has returned, whatever the outcome. A body error takes precedence
/// over a flush error.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use star_core::*;
///
/// let greet = Param::string("name");
/// let cmd = Command::new({
///     let greet = greet.clone();
///     move |ctx| {
///         let name = greet.load(ctx);
///         writeln!(ctx.stdout(), "hello {name}")?;
///         Ok(())
///     }
/// })
/// .with_positional(greet);
///
/// let (mut stdin, mut stdout, mut stderr) = (&b""[..], Vec::<u8>::new(), Vec::<u8>::new());
/// run(
///     &CancellationToken::new(),
///     &cmd,
///     &BTreeMap::new(),
///     "greet",
///     &["world".to_string()],
///     Io::new(&mut stdin, &mut stdout, &mut stderr),
/// )
/// .unwrap();
/// assert_eq!(String::from_utf8(stdout).unwrap(), "hello world\n");
/// ```
pub fn run(
    background: &CancellationToken,
    command: &Command,
    env: &Env,
    called_as: &str,
    args: &[String],
    mut io: Io<'_>,
) -> Result<(), BoxError> {
    let result = execute(background, command, env, called_as, args, io.reborrow());
    let flushed = io.flush();
    result?;
    flushed?;
    Ok(())
}

/// One level of the parse-and-execute cycle, without flushing.
pub(crate) fn execute(
    background: &CancellationToken,
    command: &Command,
    env: &Env,
    called_as: &str,
    args: &[String],
    mut io: Io<'_>,
) -> Result<(), BoxError> {
    let _span = debug_span!("command", called_as).entered();

    let binding = match bind(command.flags(), command.positionals(), args) {
        Ok(binding) => binding,
        Err(err) => {
            if let Err(write_err) = io.stderr.write_all(command.doc(called_as).as_bytes()) {
                debug!(error = %write_err, "failed to write usage");
            }
            return Err(err.into());
        }
    };

    let Some(body) = command.body() else {
        debug!("command has no body");
        return Ok(());
    };

    debug!(extra = ?binding.extra, "running command body");
    let mut ctx = Context::new(
        background,
        env,
        io.reborrow(),
        called_as.to_string(),
        binding.extra,
        binding.values,
        command,
    );
    body(&mut ctx)
}
