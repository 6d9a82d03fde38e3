use star_cli::testing::{err_contains, out_contains, out_is, run_capture};
use star_core::{Command, ExitError, Param, parse_bool, parse_from_str, parse_string};

fn tool() -> Command {
    let verbose = Param::optional("verbose", parse_bool).with_default("false");
    let count = Param::required("count", parse_from_str::<usize>).with_default("1");
    let words = Param::repeated("words", parse_string).with_min(1);

    let repeat = Command::new({
        let (verbose, count, words) = (verbose.clone(), count.clone(), words.clone());
        move |ctx| {
            let line = words.load_all(ctx).join(" ");
            let count = count.load(ctx);
            if verbose.load_opt(ctx).unwrap_or(false) {
                writeln!(ctx.stderr(), "repeating {count} times")?;
            }
            for _ in 0..count {
                writeln!(ctx.stdout(), "{line}")?;
            }
            Ok(())
        }
    })
    .with_short("prints words")
    .with_flag(verbose)
    .with_flag(count)
    .with_positional(words);

    let fail = Command::new(|_| Err(ExitError::new(5, "failed on purpose").into()))
        .with_short("always fails");

    Command::directory("text utilities")
        .with_child("repeat", repeat)
        .with_child("fail", fail)
}

#[test]
fn test_repeat_with_defaults() {
    out_is(&tool(), &["repeat", "hi", "there"], "hi there\n");
}

#[test]
fn test_repeat_with_flags_after_child_name() {
    out_is(&tool(), &["repeat", "--count", "2", "yo"], "yo\nyo\n");
}

#[test]
fn test_verbose_goes_to_stderr() {
    let out = run_capture(&tool(), &["repeat", "--verbose", "true", "x"]);
    out.result.unwrap();
    assert_eq!(out.stdout, "x\n");
    assert_eq!(out.stderr, "repeating 1 times\n");
}

#[test]
fn test_listing_without_child() {
    out_contains(&tool(), &[], "TEST\ttext utilities\n");
    out_contains(&tool(), &[], "  repeat  prints words\n");
}

#[test]
fn test_repeat_requires_a_word() {
    err_contains(&tool(), &["repeat"], "words");
}

#[test]
fn test_bad_count() {
    err_contains(&tool(), &["repeat", "--count", "many", "x"], "\"many\"");
}

#[test]
fn test_unknown_child() {
    err_contains(&tool(), &["frobnicate"], "no command found");
}

#[test]
fn test_exit_error_code_survives() {
    let out = run_capture(&tool(), &["fail"]);
    let err = out.result.unwrap_err();
    assert_eq!(star_cli::exit_code(err.as_ref()), 5);
}
