//! Precondition checks that report failure as an error value.
//!
//! Binaries that would rather stop on the spot wrap these at their entry
//! point; library code propagates the [`CoreError::FatalAssertion`].

use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// Fails with `FatalAssertion(message)` unless `check` holds.
pub fn ensure(check: bool, message: impl Into<String>) -> CoreResult<()> {
    if check {
        Ok(())
    } else {
        Err(CoreError::FatalAssertion(message.into()))
    }
}

/// Fails with `FatalAssertion(message)` unless `path` is a regular file.
pub fn ensure_file(path: impl AsRef<Path>, message: impl Into<String>) -> CoreResult<()> {
    ensure(path.as_ref().is_file(), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure() {
        assert!(ensure(true, "unused").is_ok());
        let frames = 0;
        match ensure(frames > 0, "no frames decoded") {
            Err(CoreError::FatalAssertion(msg)) => assert_eq!(msg, "no frames decoded"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_ensure_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(ensure_file(file.path(), "present").is_ok());

        let dir = tempfile::tempdir().unwrap();
        assert!(ensure_file(dir.path(), "a directory is not a file").is_err());
        assert!(ensure_file(dir.path().join("gone.mkv"), "missing").is_err());
    }
}
