//! The per-invocation execution context handed to command bodies.

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

use tokio_util::sync::CancellationToken;

use crate::command::Command;
use crate::param::Value;
use crate::parse::Values;

/// Environment variables passed to a command, collected by the caller.
pub type Env = BTreeMap<String, String>;

/// Borrowed input and output streams.
///
/// Passed down the dispatch recursion by reborrowing; never duplicated.
pub struct Io<'a> {
    pub stdin: &'a mut dyn BufRead,
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

impl<'a> Io<'a> {
    pub fn new(
        stdin: &'a mut dyn BufRead,
        stdout: &'a mut dyn Write,
        stderr: &'a mut dyn Write,
    ) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
        }
    }

    /// Borrows the same streams for a shorter lifetime.
    pub fn reborrow(&mut self) -> Io<'_> {
        Io {
            stdin: &mut *self.stdin,
            stdout: &mut *self.stdout,
            stderr: &mut *self.stderr,
        }
    }

    /// Flushes stdout, then stderr. Both are attempted; the first failure
    /// is returned.
    pub fn flush(&mut self) -> io::Result<()> {
        let out = self.stdout.flush();
        let err = self.stderr.flush();
        out.and(err)
    }
}

/// Everything a command body gets to see.
///
/// Created once per command execution and dropped when the body returns.
pub struct Context<'a> {
    /// Cancellation token shared by the whole invocation.
    pub background: &'a CancellationToken,
    /// Environment collected by the caller, unmodified.
    pub env: &'a Env,
    /// Streams of the invocation.
    pub io: Io<'a>,
    /// The name this command was invoked as.
    pub called_as: String,
    /// Tokens no declared parameter claimed, in input order.
    pub extra: Vec<String>,
    values: Values,
    command: &'a Command,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        background: &'a CancellationToken,
        env: &'a Env,
        io: Io<'a>,
        called_as: String,
        extra: Vec<String>,
        values: Values,
        command: &'a Command,
    ) -> Self {
        Self {
            background,
            env,
            io,
            called_as,
            extra,
            values,
            command,
        }
    }

    /// The command being executed.
    pub fn command(&self) -> &'a Command {
        self.command
    }

    /// Raw values bound to `name`.
    ///
    /// # Panics
    ///
    /// Panics if the command does not declare a parameter called `name`.
    pub fn param(&self, name: &str) -> &[Value] {
        self.values_for(name)
    }

    /// Returns `true` if the background token has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.background.is_cancelled()
    }

    pub fn stdin(&mut self) -> &mut dyn BufRead {
        &mut *self.io.stdin
    }

    pub fn stdout(&mut self) -> &mut dyn Write {
        &mut *self.io.stdout
    }

    pub fn stderr(&mut self) -> &mut dyn Write {
        &mut *self.io.stderr
    }

    pub(crate) fn values_for(&self, name: &str) -> &[Value] {
        if !self.command.has_param(name) {
            panic!("command does not take param {name:?}");
        }
        self.values.get(name)
    }
}
