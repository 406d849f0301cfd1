// ============================================================================
// mediautil-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with External CLI Tools
//
// This module encapsulates interactions with external command-line tools,
// currently ffprobe. Process execution goes through the `CommandRunner` trait
// from `util::command`, so the parsing side can be exercised against canned
// tool output.
//
// KEY COMPONENTS:
// - Tool discovery on PATH (`find_tool`)
// - The ffprobe wrapper and its normalized `ProbeResult`

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::path::{Path, PathBuf};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Contains the ffprobe invocation and metadata normalization
pub mod ffprobe;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffprobe::{ProbeResult, Prober, UNKNOWN, ffprobe, parse_frame_rate, parse_probe_output};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Locates a required external tool.
///
/// Bare names are searched on `PATH`; anything containing a path separator
/// is checked directly. A missing tool yields [`CoreError::ToolMissing`] with
/// `hint` attached for the user.
pub fn find_tool(tool: &Path, hint: &str) -> CoreResult<PathBuf> {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found dependency {} at {}", tool.display(), path.display());
            Ok(path)
        }
        Err(e) => {
            log::warn!("Dependency '{}' not found: {e}", tool.display());
            Err(CoreError::ToolMissing {
                tool: tool.display().to_string(),
                hint: hint.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_tool_missing() {
        let err = find_tool(Path::new("surely-not-a-real-tool-9c2e"), "install it").unwrap_err();
        match err {
            CoreError::ToolMissing { tool, hint } => {
                assert_eq!(tool, "surely-not-a-real-tool-9c2e");
                assert_eq!(hint, "install it");
            }
            other => panic!("expected ToolMissing, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_find_tool_on_path() {
        let path = find_tool(Path::new("sh"), "").unwrap();
        assert!(path.is_absolute());
    }
}
