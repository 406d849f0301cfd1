//! Entry-point assertions that end the process instead of returning.
//!
//! Only `main` and subcommand handlers use these. Anything meant for reuse
//! calls `mediautil_core::checks` and propagates the error.

use std::path::Path;
use std::process;

/// Logs `fail_message` and exits with status 1 unless `check` holds.
pub fn assert_msg(check: bool, fail_message: &str) {
    if !check {
        log::error!("{fail_message}");
        process::exit(1);
    }
}

/// [`assert_msg`] for "`path` is an existing regular file".
pub fn assert_file(path: &Path, fail_message: &str) {
    assert_msg(path.is_file(), fail_message);
}
