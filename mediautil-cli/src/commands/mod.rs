//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Module containing the implementation of the `probe` command.
/// Extracts normalized video metadata through ffprobe.
pub mod probe;

/// Module containing the implementation of the `run` command.
pub mod run;

/// Module containing the implementation of the `cat` command.
pub mod cat;
