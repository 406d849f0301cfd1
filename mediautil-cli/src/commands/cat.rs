// mediautil-cli/src/commands/cat.rs
//
// Logic for the 'cat' subcommand.

use std::io::{self, Write};

use crate::checks::assert_file;
use crate::cli::CatArgs;
use crate::error::{CliErrorContext, CliResult};

use mediautil_core::files::open_reader;

/// Copies the (possibly compressed) input to stdout.
pub fn run_cat(args: CatArgs) -> CliResult<()> {
    assert_file(
        &args.input,
        &format!("{} is not a valid file", args.input.display()),
    );

    let mut reader = open_reader(&args.input)
        .cli_with_context(|| format!("Cannot open {}", args.input.display()))?;
    let mut stdout = io::stdout().lock();
    io::copy(&mut reader, &mut stdout)
        .cli_with_context(|| format!("Cannot read {}", args.input.display()))?;
    stdout.flush()?;
    Ok(())
}
