// mediautil-cli/src/commands/probe.rs
//
// Logic for the 'probe' subcommand: resolve the ffprobe binary, probe the
// input and either print the normalized metadata or store it as JSON.

use crate::checks::assert_file;
use crate::cli::ProbeArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::output::print_probe_summary;

use mediautil_core::files::{WriteMode, open_writer};
use mediautil_core::json::{to_sorted_string, write_sorted};
use mediautil_core::{CoreConfig, Prober};

use log::{debug, info};

/// Runs the `probe` subcommand. With `verbose` the ffprobe command line is
/// echoed to stdout before it runs.
pub fn run_probe(args: ProbeArgs, verbose: bool) -> CliResult<()> {
    assert_file(
        &args.input,
        &format!("{} is not a valid file", args.input.display()),
    );

    let mut config = CoreConfig::from_env();
    if let Some(ffprobe) = args.ffprobe {
        config.ffprobe_path = ffprobe;
    }
    debug!("Using ffprobe binary: {}", config.ffprobe_path.display());

    let prober = Prober::new(config).verbose(verbose);
    let result = prober
        .probe(&args.input)
        .cli_with_context(|| format!("Failed to probe {}", args.input.display()))?;

    if args.summary {
        let title = args
            .input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| args.input.display().to_string());
        print_probe_summary(&title, &result);
        return Ok(());
    }

    match args.output {
        Some(output) => {
            let mut writer = open_writer(&output, WriteMode::Write)
                .cli_with_context(|| format!("Cannot open {}", output.display()))?;
            write_sorted(&mut writer, &result)
                .cli_with_context(|| format!("Cannot write {}", output.display()))?;
            writer
                .finish()
                .cli_with_context(|| format!("Cannot finish {}", output.display()))?;
            info!("Stored probe result in {}", output.display());
        }
        None => {
            let json = to_sorted_string(&result)?;
            println!("{json}");
        }
    }

    Ok(())
}
