// mediautil-cli/src/main.rs
//
// Entry point for the `mediautil` binary.
//
// Responsibilities:
// - Parsing command-line arguments.
// - Setting up logging (colored console, optional log file).
// - Dispatching to the subcommand handlers.
// - Reporting errors and mapping them to a nonzero exit code.

use clap::Parser;
use console::style;
use mediautil_cli::logging::init_logging;
use mediautil_cli::{Cli, Commands, run_cat, run_command, run_probe};
use std::process;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("{} {e}", style("Warning:").yellow().for_stderr());
    }

    let verbose = cli.verbose;
    let result = match cli.command {
        Commands::Probe(args) => run_probe(args, verbose),
        Commands::Run(args) => run_command(args, verbose),
        Commands::Cat(args) => run_cat(args),
    };

    if let Err(e) = result {
        log::debug!("{e:?}");
        eprintln!("{} {e}", style("Error:").red().bold().for_stderr());
        process::exit(1);
    }
}
