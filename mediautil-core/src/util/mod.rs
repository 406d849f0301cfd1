//! Utility functions and helpers module
//!
//! Responsibilities:
//! - Provide command execution infrastructure for external tools
//! - Render argument arrays as auditable, shell-quoted command lines
//! - Define the runner abstraction used to inject canned tool output in tests

pub mod command;

// Re-export commonly used types and functions
pub use command::{
    CommandRunner, RunOptions, SystemCommandRunner, quote_command, run_cmd, shell_quote,
};
