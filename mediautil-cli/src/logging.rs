// ============================================================================
// mediautil-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Wires the global CLI flags into the core logger
//
// The colored console format and the optional plain file sink live in
// mediautil-core (`LoggerConfig`); this module only maps flags onto it.
//
// USAGE:
// - default: info and above
// - -v / --verbose: debug and above, external commands are echoed
// - RUST_LOG=<level>: overrides both

use crate::cli::Cli;
use crate::error::{CliErrorContext, CliResult};

use mediautil_core::LoggerConfig;

/// Builds the logger configuration described by the global flags.
pub fn logger_config(cli: &Cli) -> LoggerConfig {
    let mut config = LoggerConfig::from_verbosity(cli.verbose);
    if cli.no_color {
        config = config.with_colors(false);
    }
    if let Some(path) = &cli.log_file {
        config = config.with_log_file(path);
    }
    config
}

/// Installs the global logger. Fails if a logger is already set or the
/// log file cannot be opened.
pub fn init_logging(cli: &Cli) -> CliResult<()> {
    logger_config(cli)
        .apply()
        .cli_context("Failed to initialize logging")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use log::LevelFilter;

    #[test]
    fn test_flags_map_onto_logger() {
        let cli = Cli::parse_from(["mediautil", "--no-color", "--log-file", "out.log", "cat", "x.txt"]);
        let config = logger_config(&cli);
        assert!(config.colors.is_none());
        assert_eq!(config.log_file.as_deref(), Some(std::path::Path::new("out.log")));
    }

    #[test]
    fn test_verbose_flag_after_subcommand() {
        let cli = Cli::parse_from(["mediautil", "run", "-v", "--", "echo", "hi"]);
        assert!(cli.verbose);
        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(logger_config(&cli).level, LevelFilter::Debug);
        }
    }
}
