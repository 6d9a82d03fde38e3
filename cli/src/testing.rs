//! Helpers for exercising commands in tests.
//!
//! Commands run in-process against in-memory streams, invoked as `TEST`
//! with an empty environment and a fresh background token.
//!
//! ```
//! use star_cli::testing::{err_contains, out_is};
//! use star_core::{Command, Param};
//!
//! let id = Param::string("id");
//! let read = Command::new({
//!     let id = id.clone();
//!     move |ctx| {
//!         let id = id.load(ctx);
//!         writeln!(ctx.stdout(), "READ {id}")?;
//!         Ok(())
//!     }
//! })
//! .with_positional(id);
//!
//! out_is(&read, &["42"], "READ 42\n");
//! err_contains(&read, &[], "no args left");
//! ```

use star_core::{BoxError, CancellationToken, Command, Env, Io, run};

/// Name commands are invoked as.
pub const CALLED_AS: &str = "TEST";

/// Everything one in-process run produced.
#[derive(Debug)]
pub struct Output {
    pub result: Result<(), BoxError>,
    pub stdout: String,
    pub stderr: String,
}

/// Runs `command` with `args` and empty stdin.
pub fn run_capture(command: &Command, args: &[&str]) -> Output {
    run_capture_with(command, args, &Env::new(), "")
}

/// Runs `command` with `args`, the given environment and stdin contents.
pub fn run_capture_with(command: &Command, args: &[&str], env: &Env, stdin: &str) -> Output {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    let mut input = stdin.as_bytes();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let result = run(
        &CancellationToken::new(),
        command,
        env,
        CALLED_AS,
        &args,
        Io::new(&mut input, &mut stdout, &mut stderr),
    );
    Output {
        result,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    }
}

/// Asserts the run succeeds and its stdout is exactly `expected`.
#[track_caller]
pub fn out_is(command: &Command, args: &[&str], expected: &str) {
    let out = run_capture(command, args);
    if let Err(err) = &out.result {
        panic!("command {args:?} failed: {err}\nstderr: {}", out.stderr);
    }
    assert_eq!(out.stdout, expected, "stdout of {args:?}");
}

/// Asserts the run succeeds and its stdout contains `needle`.
#[track_caller]
pub fn out_contains(command: &Command, args: &[&str], needle: &str) {
    let out = run_capture(command, args);
    if let Err(err) = &out.result {
        panic!("command {args:?} failed: {err}\nstderr: {}", out.stderr);
    }
    assert!(
        out.stdout.contains(needle),
        "stdout {:?} does not contain {needle:?}",
        out.stdout
    );
}

/// Asserts the run fails with an error whose message contains `needle`.
#[track_caller]
pub fn err_contains(command: &Command, args: &[&str], needle: &str) {
    let out = run_capture(command, args);
    match &out.result {
        Ok(()) => panic!("command {args:?} succeeded, stdout: {:?}", out.stdout),
        Err(err) => {
            let msg = err.to_string();
            assert!(msg.contains(needle), "error {msg:?} does not contain {needle:?}");
        }
    }
}
