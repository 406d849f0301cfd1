//! Configuration structures and constants for the mediautil-core library.
//!
//! Settings can be given explicitly through [`CoreConfigBuilder`] or picked up
//! from `MEDIAUTIL_*` environment variables with [`CoreConfig::from_env`].

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default name of the media probing tool, resolved through `PATH`.
pub const DEFAULT_FFPROBE: &str = "ffprobe";

/// Environment variable overriding the ffprobe location.
pub const ENV_FFPROBE: &str = "MEDIAUTIL_FFPROBE";

/// Environment variable holding a command timeout in seconds.
pub const ENV_COMMAND_TIMEOUT: &str = "MEDIAUTIL_COMMAND_TIMEOUT";

/// Main configuration structure for the mediautil-core library.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreConfig {
    /// Program name or path used to run ffprobe
    pub ffprobe_path: PathBuf,

    /// Maximum run time for external commands; `None` waits forever
    pub command_timeout: Option<Duration>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: PathBuf::from(DEFAULT_FFPROBE),
            command_timeout: None,
        }
    }
}

impl CoreConfig {
    /// Defaults, overridden by any `MEDIAUTIL_*` variables that are set.
    ///
    /// An unparsable or non-positive timeout is ignored with a warning.
    pub fn from_env() -> Self {
        let mut builder = CoreConfigBuilder::new();

        if let Some(path) = env::var_os(ENV_FFPROBE).filter(|p| !p.is_empty()) {
            builder = builder.ffprobe_path(PathBuf::from(path));
        }

        if let Ok(raw) = env::var(ENV_COMMAND_TIMEOUT) {
            match parse_timeout_secs(&raw) {
                Some(timeout) => builder = builder.command_timeout(timeout),
                None => log::warn!("Ignoring invalid {ENV_COMMAND_TIMEOUT} value: {raw:?}"),
            }
        }

        builder.build()
    }
}

/// Parses a positive number of seconds, fractions allowed.
///
/// Values too large for a `Duration` are rejected like any other bad input.
pub fn parse_timeout_secs(raw: &str) -> Option<Duration> {
    let secs: f64 = raw.trim().parse().ok()?;
    if secs > 0.0 {
        Duration::try_from_secs_f64(secs).ok()
    } else {
        None
    }
}

/// Builder for creating CoreConfig instances.
///
/// ```rust
/// use mediautil_core::config::CoreConfigBuilder;
/// use std::time::Duration;
///
/// let config = CoreConfigBuilder::new()
///     .ffprobe_path("/opt/ffmpeg/bin/ffprobe")
///     .command_timeout(Duration::from_secs(30))
///     .build();
/// assert_eq!(config.command_timeout, Some(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    config: CoreConfig,
}

impl CoreConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ffprobe_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ffprobe_path = path.into();
        self
    }

    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.config.command_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> CoreConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CoreConfig::default();
        assert_eq!(config.ffprobe_path, PathBuf::from("ffprobe"));
        assert_eq!(config.command_timeout, None);
    }

    #[test]
    fn test_parse_timeout_secs() {
        assert_eq!(parse_timeout_secs("30"), Some(Duration::from_secs(30)));
        assert_eq!(parse_timeout_secs(" 1.5 "), Some(Duration::from_millis(1500)));
        assert_eq!(parse_timeout_secs("0"), None);
        assert_eq!(parse_timeout_secs("-4"), None);
        assert_eq!(parse_timeout_secs("soon"), None);
        assert_eq!(parse_timeout_secs("inf"), None);
        assert_eq!(parse_timeout_secs("NaN"), None);
        assert_eq!(parse_timeout_secs("1e30"), None);
    }
}
