// ============================================================================
// mediautil-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// This module provides error handling utilities for the CLI that integrate
// with the mediautil-core error types while adding CLI-specific context.
//
// KEY COMPONENTS:
// - CliError / CliResult: error and result types for subcommands
// - CliErrorContext: attaches a human-readable context to failed results

// ---- Internal crate imports ----
use mediautil_core::CoreError;

// ---- External crate imports ----
use thiserror::Error;

// ---- Standard library imports ----
use std::fmt;

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Errors surfaced by subcommands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: CoreError,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Core(err.into())
    }
}

/// Type alias for CLI results.
pub type CliResult<T> = std::result::Result<T, CliError>;

// ============================================================================
// ERROR CONVERSION UTILITIES
// ============================================================================

/// Extension trait for adding context to core failures in the CLI.
pub trait CliErrorContext<T> {
    /// Add context to an error.
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display;

    /// Add context using a closure (for lazy evaluation).
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display,
    {
        self.map_err(|e| CliError::Context {
            context: context.to_string(),
            source: e.into(),
        })
    }

    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| CliError::Context {
            context: f().to_string(),
            source: e.into(),
        })
    }
}
