//! Human-readable terminal output helpers.
//!
//! Styling goes through `console`, which drops the escapes automatically when
//! stdout is not a terminal or colors are disabled.

use std::fmt::Display;

use console::style;
use mediautil_core::ProbeResult;
use mediautil_core::external::UNKNOWN;

/// Print a heading with colored styling and clear separation
pub fn print_heading(text: &str) {
    let line = style("=".repeat(50)).blue().bright();

    println!("\n{line}");
    println!("{}", style(format!(" {text} ")).bold().white().bright());
    println!("{line}\n");
}

/// Print an info line with label and value, with the label colored
pub fn print_info<T: Display>(label: &str, value: T) {
    println!("{}: {}", style(label).cyan().bright(), value);
}

fn or_unknown<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| UNKNOWN.to_string(), |v| v.to_string())
}

/// Print the probe result as a labelled table.
pub fn print_probe_summary(title: &str, info: &ProbeResult) {
    print_heading(title);

    let resolution = match (info.width, info.height) {
        (Some(w), Some(h)) => format!("{w}x{h}"),
        _ => UNKNOWN.to_string(),
    };
    print_info("Resolution", resolution);
    print_info("Codec", or_unknown(info.codec()));
    print_info("Profile", or_unknown(info.video_profile()));
    print_info("Pixel format", or_unknown(info.pix_fmt.as_deref()));
    print_info("Bit depth", or_unknown(info.bits_per_raw_sample));
    print_info("Frame rate", or_unknown(info.avg_frame_rate.map(|fps| format!("{fps} fps"))));
    print_info("Bitrate", or_unknown(info.bitrate.map(|bps| format!("{:.0} kb/s", bps as f64 / 1000.0))));
    print_info("Duration", or_unknown(info.duration.map(|secs| format!("{secs:.2} s"))));
}
