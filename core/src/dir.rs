//! Directory commands: child selection and listing.

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::command::Command;
use crate::context::Context;
use crate::error::{BoxError, Error};
use crate::execute::execute;
use crate::parse::first_bare_token;

/// Body of every directory command.
///
/// The first extra token that is neither a flag nor a flag's value names the
/// child. It is removed and the child runs with the remaining tokens, in
/// order. With no such token, the children are listed on stdout.
pub(crate) fn dispatch(ctx: &mut Context<'_>) -> Result<(), BoxError> {
    let command = ctx.command();
    let Some(at) = first_bare_token(&ctx.extra) else {
        debug!(called_as = %ctx.called_as, "no sub-command given, listing children");
        write_listing(&mut *ctx.io.stdout, &ctx.called_as, command)?;
        return Ok(());
    };

    let mut rest = ctx.extra.clone();
    let name = rest.remove(at);
    let Some(child) = command.child(&name) else {
        return Err(Error::NoSuchCommand(name).into());
    };

    let called_as = format!("{} {name}", ctx.called_as);
    debug!(child = %name, called_as = %called_as, "dispatching to sub-command");
    execute(
        ctx.background,
        child,
        ctx.env,
        &called_as,
        &rest,
        ctx.io.reborrow(),
    )
}

/// Writes the child listing of a directory command.
///
/// Declared groups come first, in declaration order, each listing its
/// members by name. Remaining children follow under `COMMANDS:`.
pub fn write_listing(
    out: &mut dyn Write,
    called_as: &str,
    command: &Command,
) -> std::io::Result<()> {
    let base = Path::new(called_as)
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_else(|| called_as.into());
    writeln!(out, "{base}\t{}", command.short())?;
    writeln!(out)?;

    let width = command.child_names().iter().map(|n| n.len()).max().unwrap_or(0);
    let mut grouped: Vec<&str> = Vec::new();
    for group in command.groups() {
        let mut members: Vec<&str> = group.members.iter().map(String::as_str).collect();
        members.sort_unstable();
        members.dedup();
        writeln!(out, "{}:", group.title.to_uppercase())?;
        for name in members {
            if let Some(child) = command.child(name) {
                writeln!(out, "  {name:<width$}  {}", child.short())?;
                grouped.push(name);
            }
        }
        writeln!(out)?;
    }

    let rest: Vec<(&String, &Command)> = command
        .children()
        .filter(|(name, _)| !grouped.contains(&name.as_str()))
        .collect();
    if rest.is_empty() && !command.groups().is_empty() {
        return Ok(());
    }
    writeln!(out, "COMMANDS:")?;
    for (name, child) in rest {
        writeln!(out, "  {name:<width$}  {}", child.short())?;
    }
    writeln!(out)?;
    Ok(())
}
