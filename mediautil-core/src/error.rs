use std::path::PathBuf;

use thiserror::Error;

/// Custom error types for mediautil
#[derive(Error, Debug)]
pub enum CoreError {
    /// The process ran but exited with a non-zero status.
    #[error("Nonzero return status running command {command}:\n{output}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },

    /// The process could not be spawned, waited on, or read from.
    #[error("General error running command {command}:\n{output}")]
    CommandError { command: String, output: String },

    #[error("{tool} not found on PATH: {hint}")]
    ToolMissing { tool: String, hint: String },

    #[error("{} is not a valid file: {hint}", .path.display())]
    FileNotFound { path: PathBuf, hint: String },

    #[error("{} is somehow not valid, so ffprobe could not extract anything", .0.display())]
    ProbeEmpty(PathBuf),

    #[error("Failed to parse ffprobe output: {0}")]
    ProbeParse(String),

    #[error("Assertion failed: {0}")]
    FatalAssertion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl CoreError {
    /// Captured process output for command failures, if any.
    pub fn output(&self) -> Option<&str> {
        match self {
            CoreError::CommandFailed { output, .. } | CoreError::CommandError { output, .. } => {
                Some(output)
            }
            _ => None,
        }
    }
}

/// Result type for mediautil operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;
