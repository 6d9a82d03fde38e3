//! Mapping errors to process exit codes.

use std::error::Error;

use star_core::ExitError;

/// Exit code used for any failure that does not carry its own.
pub const FAILURE: i32 = 1;

/// Exit code for `err`.
///
/// The first [`ExitError`] found along the source chain decides the code;
/// anything else maps to [`FAILURE`].
pub fn exit_code(err: &(dyn Error + 'static)) -> i32 {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(exit) = e.downcast_ref::<ExitError>() {
            return exit.exit_code();
        }
        current = e.source();
    }
    FAILURE
}

/// Narrows an exit code to the `u8` range a process can report.
pub(crate) fn to_process_code(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(FAILURE as u8)
}
