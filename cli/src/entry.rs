//! Process entry point.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use star_core::{BoxError, CancellationToken, Command, Io, run};
use tracing::debug;

use crate::config::MainConfig;
use crate::env::os_env;
use crate::exit::{exit_code, to_process_code};
use crate::logging::{LoggingError, init_logging};

/// Runs `command` as the whole program and returns its exit status.
///
/// Arguments come from the process (without the program path), the
/// environment is limited to variables prefixed with the upper-cased
/// `name`, and stdout is buffered until the command finishes.
///
/// ```no_run
/// use std::process::ExitCode;
/// use star_core::Command;
///
/// fn main() -> ExitCode {
///     let hello = Command::new(|ctx| {
///         writeln!(ctx.stdout(), "hello")?;
///         Ok(())
///     });
///     star_cli::main("hello", &hello)
/// }
/// ```
pub fn main(name: &str, command: &Command) -> ExitCode {
    let args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    run_main(
        name,
        command,
        &args,
        &MainConfig::default(),
        CancellationToken::new(),
    )
}

/// [`main`] with explicit arguments, configuration and background token.
pub fn run_main(
    name: &str,
    command: &Command,
    args: &[String],
    config: &MainConfig,
    background: CancellationToken,
) -> ExitCode {
    if config.init_logging {
        match init_logging(config) {
            Ok(()) | Err(LoggingError::Install(_)) => {}
            Err(err) => eprintln!("WARNING: {err}"),
        }
    }

    let prefix = config.env_prefix_for(name);
    let env = os_env(&prefix);
    debug!(program = name, prefix = %prefix, vars = env.len(), "starting");

    let mut stdin = io::stdin().lock();
    let mut stdout = BufWriter::new(io::stdout().lock());
    let mut stderr = io::stderr().lock();
    let result = run(
        &background,
        command,
        &env,
        name,
        args,
        Io::new(&mut stdin, &mut stdout, &mut stderr),
    );
    drop(stdout);

    ExitCode::from(to_process_code(report(result, &mut stderr)))
}

/// Writes `ERROR: <err>` for a failed run and returns the exit code.
pub fn report(result: Result<(), BoxError>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            let _ = writeln!(stderr, "ERROR: {err}");
            exit_code(err.as_ref())
        }
    }
}
