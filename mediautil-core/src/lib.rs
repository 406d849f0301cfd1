//! Helper library for media pipelines: external commands, ffprobe metadata,
//! transparently compressed text files, JSON persistence and colorized logging.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use mediautil_core::{RunOptions, ffprobe, json_store, run_cmd};
//!
//! let listing = run_cmd(&["ls", "-l"], &RunOptions::new().verbose(true)).unwrap();
//! println!("{}", listing.unwrap_or_default());
//!
//! let info = ffprobe("/path/to/video.mkv").unwrap();
//! println!("{:?} fps", info.avg_frame_rate);
//! json_store("/path/to/video_info.json", &info).unwrap();
//! ```

pub mod checks;
pub mod config;
pub mod error;
pub mod external;
pub mod files;
pub mod json;
pub mod logging;
pub mod util;

// Re-exports for public API
pub use checks::{ensure, ensure_file};
pub use config::{CoreConfig, CoreConfigBuilder};
pub use error::{CoreError, CoreResult};
pub use external::{ProbeResult, Prober, ffprobe};
pub use files::{Compression, TextWriter, WriteMode, open_reader, open_writer, read_to_string};
pub use json::{json_load, json_store};
pub use logging::{ColorCode, LevelColors, LoggerConfig};
pub use util::command::{CommandRunner, RunOptions, SystemCommandRunner, run_cmd};
