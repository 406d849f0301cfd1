//! Centralized logging configuration for mediautil
//!
//! This module handles:
//! - Decorating severity labels with ANSI color codes on the console
//! - Optionally mirroring every record, uncolored and timestamped, to a file
//! - Choosing the level from flags or `RUST_LOG`
//!
//! All of it is described by one [`LoggerConfig`] value built at startup and
//! installed once with [`LoggerConfig::apply`]. The color table travels inside
//! the console formatter; nothing else in the process is touched.

use std::path::PathBuf;
use std::str::FromStr;

use log::{Level, LevelFilter};

use crate::error::{CoreError, CoreResult};

/// Bold terminal colors understood by the console formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCode {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    /// Resets the attributes set by the others.
    EndCode,
}

impl ColorCode {
    pub const ALL: [ColorCode; 9] = [
        ColorCode::Black,
        ColorCode::Red,
        ColorCode::Green,
        ColorCode::Yellow,
        ColorCode::Blue,
        ColorCode::Magenta,
        ColorCode::Cyan,
        ColorCode::White,
        ColorCode::EndCode,
    ];

    /// The ANSI escape sequence for this color.
    pub const fn escape(self) -> &'static str {
        match self {
            ColorCode::Black => "\x1b[1;30m",
            ColorCode::Red => "\x1b[1;31m",
            ColorCode::Green => "\x1b[1;32m",
            ColorCode::Yellow => "\x1b[1;33m",
            ColorCode::Blue => "\x1b[1;34m",
            ColorCode::Magenta => "\x1b[1;35m",
            ColorCode::Cyan => "\x1b[1;36m",
            ColorCode::White => "\x1b[1;37m",
            ColorCode::EndCode => "\x1b[1;0m",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ColorCode::Black => "black",
            ColorCode::Red => "red",
            ColorCode::Green => "green",
            ColorCode::Yellow => "yellow",
            ColorCode::Blue => "blue",
            ColorCode::Magenta => "magenta",
            ColorCode::Cyan => "cyan",
            ColorCode::White => "white",
            ColorCode::EndCode => "end_code",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Wraps `text` in this color and a reset.
    pub fn paint(self, text: &str) -> String {
        format!("{}{text}{}", self.escape(), ColorCode::EndCode.escape())
    }
}

/// Which color each severity label is painted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelColors {
    pub error: ColorCode,
    pub warn: ColorCode,
    pub info: ColorCode,
    pub debug: ColorCode,
    pub trace: ColorCode,
}

impl Default for LevelColors {
    fn default() -> Self {
        Self {
            error: ColorCode::Red,
            warn: ColorCode::Yellow,
            info: ColorCode::Green,
            debug: ColorCode::Blue,
            trace: ColorCode::Magenta,
        }
    }
}

impl LevelColors {
    pub fn for_level(&self, level: Level) -> ColorCode {
        match level {
            Level::Error => self.error,
            Level::Warn => self.warn,
            Level::Info => self.info,
            Level::Debug => self.debug,
            Level::Trace => self.trace,
        }
    }
}

/// Logger settings, built once at startup.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub level: LevelFilter,
    /// `None` prints bare level names.
    pub colors: Option<LevelColors>,
    /// Extra sink receiving uncolored, timestamped lines.
    pub log_file: Option<PathBuf>,
}

impl LoggerConfig {
    /// Colors are on when stderr is a color-capable terminal.
    pub fn new(level: LevelFilter) -> Self {
        let colors = console::colors_enabled_stderr().then(LevelColors::default);
        Self {
            level,
            colors,
            log_file: None,
        }
    }

    /// Debug when `verbose`, info otherwise. A level name in `RUST_LOG`
    /// takes precedence over both.
    pub fn from_verbosity(verbose: bool) -> Self {
        let fallback = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        let level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|raw| LevelFilter::from_str(raw.trim()).ok())
            .unwrap_or(fallback);
        Self::new(level)
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        let current = self.colors.take();
        self.colors = enabled.then(|| current.unwrap_or_default());
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// The console label for `level`, e.g. `"\x1b[1;31mERROR\x1b[1;0m"`.
    pub fn level_label(&self, level: Level) -> String {
        decorate(self.colors.as_ref(), level)
    }

    /// Installs the configuration as the process-wide logger.
    ///
    /// Fails if the log file cannot be opened or a logger is already set.
    pub fn apply(self) -> CoreResult<()> {
        let colors = self.colors;
        let console = fern::Dispatch::new()
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "{}:{}: {}",
                    decorate(colors.as_ref(), record.level()),
                    record.target(),
                    message
                ))
            })
            .chain(std::io::stderr());

        let mut root = fern::Dispatch::new().level(self.level).chain(console);

        if let Some(path) = &self.log_file {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = fern::log_file(path)?;
            root = root.chain(
                fern::Dispatch::new()
                    .format(|out, message, record| {
                        out.finish(format_args!(
                            "{} [{}] {}",
                            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                            record.level(),
                            message
                        ))
                    })
                    .chain(file),
            );
        }

        root.apply()
            .map_err(|e| CoreError::Logging(e.to_string()))?;
        log::debug!("Logger initialized with level: {}", self.level);
        Ok(())
    }
}

fn decorate(colors: Option<&LevelColors>, level: Level) -> String {
    match colors {
        Some(colors) => colors.for_level(level).paint(level.as_str()),
        None => level.as_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_escapes() {
        assert_eq!(ColorCode::Red.escape(), "\u{1b}[1;31m");
        assert_eq!(ColorCode::EndCode.escape(), "\u{1b}[1;0m");
        assert_eq!(ColorCode::from_name("yellow"), Some(ColorCode::Yellow));
        assert_eq!(ColorCode::from_name("end_code"), Some(ColorCode::EndCode));
        assert_eq!(ColorCode::from_name("purple"), None);
    }

    #[test]
    fn test_decorated_labels() {
        let config = LoggerConfig::new(LevelFilter::Info).with_colors(true);
        assert_eq!(config.level_label(Level::Error), "\x1b[1;31mERROR\x1b[1;0m");
        assert_eq!(config.level_label(Level::Warn), "\x1b[1;33mWARN\x1b[1;0m");
        assert_eq!(config.level_label(Level::Info), "\x1b[1;32mINFO\x1b[1;0m");
        assert_eq!(config.level_label(Level::Debug), "\x1b[1;34mDEBUG\x1b[1;0m");
    }

    #[test]
    fn test_plain_labels() {
        let config = LoggerConfig::new(LevelFilter::Info).with_colors(false);
        assert_eq!(config.colors, None);
        assert_eq!(config.level_label(Level::Warn), "WARN");
    }

    #[test]
    fn test_custom_palette() {
        let mut config = LoggerConfig::new(LevelFilter::Debug).with_colors(true);
        if let Some(colors) = config.colors.as_mut() {
            colors.info = ColorCode::Cyan;
        }
        assert_eq!(config.level_label(Level::Info), ColorCode::Cyan.paint("INFO"));
    }
}
