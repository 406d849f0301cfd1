// mediautil-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use mediautil_core::config::parse_timeout_secs;
use std::path::PathBuf;
use std::time::Duration;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "mediautil: media pipeline helpers",
    long_about = "Probes media files with ffprobe, runs external commands and reads plain or compressed text files via mediautil-core."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging and echo every external command before it runs
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Disable ANSI colors in log output
    #[arg(long, global = true, default_value_t = false)]
    pub no_color: bool,

    /// Optional: Also write log records to this file (uncolored)
    #[arg(long, global = true, value_name = "LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extracts normalized video metadata from a media file with ffprobe
    Probe(ProbeArgs),
    /// Runs an external command and prints its combined stdout/stderr
    Run(RunArgs),
    /// Prints a text file, transparently decompressing gzip and bzip2
    Cat(CatArgs),
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Media file to inspect
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Optional: Store the JSON result here instead of printing it.
    /// Names containing "gz" or "bz2" are written compressed.
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Optional: ffprobe binary to use instead of the one on PATH.
    /// Can also be set via the MEDIAUTIL_FFPROBE environment variable.
    #[arg(long, value_name = "PATH", env = "MEDIAUTIL_FFPROBE")]
    pub ffprobe: Option<PathBuf>,

    /// Print a labelled summary instead of JSON
    #[arg(long, default_value_t = false, conflicts_with = "output")]
    pub summary: bool,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Print the command without running it
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Optional: Kill the command after this many seconds.
    /// Can also be set via the MEDIAUTIL_COMMAND_TIMEOUT environment variable.
    #[arg(long, value_name = "SECS", env = "MEDIAUTIL_COMMAND_TIMEOUT", value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Program and arguments, passed through without a shell
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CatArgs {
    /// File to print; names containing "bz2" or "gz" are decompressed
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
}

fn parse_timeout(raw: &str) -> Result<Duration, String> {
    parse_timeout_secs(raw).ok_or_else(|| format!("expected a positive number of seconds, got {raw:?}"))
}
