// mediautil-cli/src/lib.rs
//
// Library portion of the mediautil CLI application.
// Contains argument definitions and command logic.

pub mod checks;
pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

// Re-export items needed by the binary or integration tests
pub use cli::{CatArgs, Cli, Commands, ProbeArgs, RunArgs};
pub use commands::{cat::run_cat, probe::run_probe, run::run_command};
pub use error::{CliError, CliResult};
