// mediautil-cli/src/commands/run.rs
//
// Logic for the 'run' subcommand: execute an external program through
// mediautil-core and relay its combined output.

use std::io::{self, Write};

use crate::cli::RunArgs;
use crate::error::CliResult;

use mediautil_core::{RunOptions, run_cmd};

use log::warn;

/// Runs the `run` subcommand. `verbose` comes from the global `-v` flag.
pub fn run_command(args: RunArgs, verbose: bool) -> CliResult<()> {
    let options = RunOptions::new()
        .dry_run(args.dry_run)
        .verbose(verbose)
        .timeout(args.timeout);

    match run_cmd(&args.command, &options)? {
        Some(output) => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
        }
        None if !args.dry_run => warn!("Command produced no result"),
        None => {}
    }

    Ok(())
}
