use std::process::ExitCode;

fn main() -> ExitCode {
    star_cli::main("crud", &star_demos::crud())
}
