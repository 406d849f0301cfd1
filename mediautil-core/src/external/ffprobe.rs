//! FFprobe integration for media analysis and information extraction
//!
//! This module runs ffprobe against a single file and reduces its JSON report
//! to the handful of stream and format properties the pipeline cares about.
//! Anything ffprobe does not report is kept as "unknown" rather than guessed.

use std::path::Path;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::find_tool;
use crate::util::command::{CommandRunner, RunOptions, SystemCommandRunner};

/// Sentinel stored for properties ffprobe did not report.
pub const UNKNOWN: &str = "unknown";

const FFPROBE_HINT: &str =
    "you need to have ffprobe installed, it ships with FFmpeg (https://ffmpeg.org/download.html)";
const FILE_HINT: &str = "check that the path exists and points to a regular file";

/// Normalized subset of ffprobe metadata for the first video stream.
///
/// `None` means ffprobe did not report the property. Serializing produces the
/// flat mapping consumers store alongside their results, see
/// [`ProbeResult::to_map`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeResult {
    pub pix_fmt: Option<String>,
    pub bits_per_raw_sample: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Average frame rate rounded to the nearest integer.
    pub avg_frame_rate: Option<i64>,
    pub codec_name: Option<String>,
    pub profile: Option<String>,
    /// Overall container bitrate in bits per second.
    pub bitrate: Option<u64>,
    /// Container duration in seconds.
    pub duration: Option<f64>,
}

impl ProbeResult {
    /// Alias of `codec_name`.
    pub fn codec(&self) -> Option<&str> {
        self.codec_name.as_deref()
    }

    /// Alias of `profile`.
    pub fn video_profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// Flat key/value view with sentinels filled in.
    ///
    /// Stream properties that are missing read `"unknown"`, a missing bitrate
    /// reads `-1` and a missing duration reads `0`. `codec` and
    /// `video_profile` repeat `codec_name` and `profile`.
    pub fn to_map(&self) -> Map<String, Value> {
        fn or_unknown<T: Into<Value>>(value: Option<T>) -> Value {
            value.map_or_else(|| Value::from(UNKNOWN), Into::into)
        }

        let mut map = Map::new();
        map.insert("pix_fmt".into(), or_unknown(self.pix_fmt.clone()));
        map.insert("bits_per_raw_sample".into(), or_unknown(self.bits_per_raw_sample));
        map.insert("width".into(), or_unknown(self.width));
        map.insert("height".into(), or_unknown(self.height));
        map.insert("avg_frame_rate".into(), or_unknown(self.avg_frame_rate));
        map.insert("codec_name".into(), or_unknown(self.codec_name.clone()));
        map.insert("profile".into(), or_unknown(self.profile.clone()));
        map.insert("codec".into(), or_unknown(self.codec_name.clone()));
        map.insert("video_profile".into(), or_unknown(self.profile.clone()));
        map.insert(
            "bitrate".into(),
            self.bitrate.map_or(Value::from(-1), Value::from),
        );
        map.insert(
            "duration".into(),
            self.duration.map_or(Value::from(0), Value::from),
        );
        map
    }
}

impl Serialize for ProbeResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// JSON structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    #[serde(default)]
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    pix_fmt: Option<String>,
    bits_per_raw_sample: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    codec_name: Option<String>,
    profile: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    bit_rate: Option<String>,
    duration: Option<String>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Evaluates an ffprobe rational such as `"30000/1001"` to a rounded integer.
///
/// Only `int/int` and bare integers are accepted. Halves round to even, so
/// `"5/2"` gives 2.
pub fn parse_frame_rate(raw: &str) -> CoreResult<i64> {
    let invalid = || CoreError::ProbeParse(format!("invalid frame rate {raw:?}"));

    let (num, den) = raw.split_once('/').unwrap_or((raw, "1"));
    let num: i64 = num.trim().parse().map_err(|_| invalid())?;
    let den: i64 = den.trim().parse().map_err(|_| invalid())?;
    if den == 0 {
        return Err(invalid());
    }

    Ok((num as f64 / den as f64).round_ties_even() as i64)
}

fn parse_number<T: std::str::FromStr>(field: &str, raw: &str) -> CoreResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| CoreError::ProbeParse(format!("invalid {field} {raw:?}")))
}

/// Reduces raw `ffprobe -of json` output to a [`ProbeResult`].
///
/// Streams are applied in order, later values overwriting earlier ones. An
/// `avg_frame_rate` of `"0/0"` counts as not reported.
pub fn parse_probe_output(json: &str) -> CoreResult<ProbeResult> {
    let parsed: FfprobeOutput = serde_json::from_str(json)
        .map_err(|e| CoreError::ProbeParse(format!("ffprobe JSON parse error: {e}")))?;

    let mut result = ProbeResult::default();

    for stream in parsed.streams {
        if let Some(pix_fmt) = stream.pix_fmt {
            result.pix_fmt = Some(pix_fmt);
        }
        if let Some(bits) = stream.bits_per_raw_sample {
            result.bits_per_raw_sample = Some(parse_number("bits_per_raw_sample", &bits)?);
        }
        if let Some(width) = stream.width {
            result.width = Some(width);
        }
        if let Some(height) = stream.height {
            result.height = Some(height);
        }
        // Still images and cover art report "0/0": no frame rate at all.
        if let Some(rate) = stream.avg_frame_rate.filter(|rate| rate.trim() != "0/0") {
            result.avg_frame_rate = Some(parse_frame_rate(&rate)?);
        }
        if let Some(codec_name) = stream.codec_name {
            result.codec_name = Some(codec_name);
        }
        if let Some(profile) = stream.profile {
            result.profile = Some(profile);
        }
    }

    if let Some(format) = parsed.format {
        result.bitrate = format
            .bit_rate
            .map(|raw| parse_number("bit_rate", &raw))
            .transpose()?;
        result.duration = format
            .duration
            .map(|raw| parse_number("duration", &raw))
            .transpose()?;
    }

    Ok(result)
}

/// Argument array asking for format info plus the first video stream as JSON.
pub fn probe_command(tool: &Path, input: &Path) -> Vec<String> {
    vec![
        tool.to_string_lossy().into_owned(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-show_format".to_string(),
        "-select_streams".to_string(),
        "v:0".to_string(),
        "-show_streams".to_string(),
        "-of".to_string(),
        "json".to_string(),
        input.to_string_lossy().into_owned(),
    ]
}

// ---------------------------------------------------------------------------
// Prober
// ---------------------------------------------------------------------------

/// Runs ffprobe through a [`CommandRunner`].
#[derive(Debug, Clone)]
pub struct Prober<R = SystemCommandRunner> {
    runner: R,
    config: CoreConfig,
    verbose: bool,
}

impl Prober<SystemCommandRunner> {
    pub fn new(config: CoreConfig) -> Self {
        Self::with_runner(SystemCommandRunner, config)
    }
}

impl<R: CommandRunner> Prober<R> {
    pub fn with_runner(runner: R, config: CoreConfig) -> Self {
        Self {
            runner,
            config,
            verbose: false,
        }
    }

    /// Print the ffprobe command line before running it.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Probes `path`.
    ///
    /// Fails with `ToolMissing` when ffprobe cannot be found and with
    /// `FileNotFound` when `path` is not a regular file, both before anything
    /// is spawned. Empty tool output yields `ProbeEmpty`.
    pub fn probe(&self, path: &Path) -> CoreResult<ProbeResult> {
        let tool = find_tool(&self.config.ffprobe_path, FFPROBE_HINT)?;

        if !path.is_file() {
            return Err(CoreError::FileNotFound {
                path: path.to_path_buf(),
                hint: FILE_HINT.to_string(),
            });
        }

        log::debug!("Running ffprobe for video properties on: {}", path.display());

        let cmd = probe_command(&tool, path);
        let options = RunOptions::new()
            .verbose(self.verbose)
            .timeout(self.config.command_timeout);
        let output = self.runner.run(&cmd, &options)?.unwrap_or_default();

        let output = output.trim();
        if output.is_empty() {
            log::error!("ffprobe returned nothing for {}", path.display());
            return Err(CoreError::ProbeEmpty(path.to_path_buf()));
        }

        parse_probe_output(output)
    }
}

/// Probes `path` with the system runner and environment configuration.
pub fn ffprobe(path: impl AsRef<Path>) -> CoreResult<ProbeResult> {
    Prober::new(CoreConfig::from_env()).probe(path.as_ref())
}
