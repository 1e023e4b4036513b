//! Reading source video metadata with `ffprobe`.
//!
//! Probing is best effort: the only error is `ffprobe` not being installed.
//! Anything else that goes wrong (the tool failing, garbage output, missing
//! fields) just leaves the corresponding [SourceInfo] fields unknown.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::runner::ToolRunner;
use crate::source::{Dimensions, SourceInfo};

/// The name of the probing tool.
pub const FFPROBE: &str = "ffprobe";

/// Probe `path` for its frame rate, duration and dimensions.
pub fn probe(runner: &impl ToolRunner, path: &Path) -> Result<SourceInfo, ProbeError> {
    let ffprobe = runner.locate(FFPROBE).ok_or(ProbeError::ToolMissing)?;

    let captured = match runner.capture(&ffprobe, &ffprobe_args(path)) {
        Ok(captured) => captured,
        Err(e) => {
            util::debug_log_warning!("Failed to run `{}`: {e}", ffprobe.display());
            return Ok(SourceInfo::default());
        }
    };

    if !captured.success {
        util::debug_log_warning!("ffprobe failed on `{}`.", path.display());
        return Ok(SourceInfo::default());
    }

    Ok(parse_probe_output(&captured.stdout))
}

/// The arguments `ffprobe` is called with (JSON output of the streams and the
/// container format).
pub fn ffprobe_args(path: &Path) -> Vec<String> {
    [
        "-v",
        "quiet",
        "-print_format",
        "json",
        "-show_format",
        "-show_streams",
    ]
    .into_iter()
    .map(String::from)
    .chain([path.to_string_lossy().into_owned()])
    .collect()
}

/// Extract [SourceInfo] from `ffprobe`'s JSON output. The first video stream
/// is used. Malformed JSON gives [SourceInfo::default].
pub fn parse_probe_output(json: &str) -> SourceInfo {
    let output: FfprobeOutput = match serde_json::from_str(json) {
        Ok(output) => output,
        Err(e) => {
            util::debug_log_warning!("Unreadable ffprobe output: {e}");
            return SourceInfo::default();
        }
    };

    let video = output
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));

    let fps = video.and_then(|s| {
        let rate = |r: &Option<String>| r.as_deref().and_then(parse_frame_rate_fraction);
        rate(&s.avg_frame_rate).or_else(|| rate(&s.r_frame_rate))
    });

    let dimensions =
        video.and_then(|s| Dimensions::new(s.width.unwrap_or(0), s.height.unwrap_or(0)));

    let duration = output
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0);

    SourceInfo {
        fps,
        duration,
        dimensions,
    }
}

/// Parse an ffprobe rational like `30000/1001`. [None] is returned for
/// anything else, a zero denominator, or a result that isn't a positive finite
/// number.
pub fn parse_frame_rate_fraction(text: &str) -> Option<f64> {
    let (num, den) = text.trim().split_once('/')?;
    let num: f64 = num.parse().ok()?;
    let den: f64 = den.parse().ok()?;
    if den == 0.0 {
        return None;
    }

    let fps = num / den;
    (fps.is_finite() && fps > 0.0).then_some(fps)
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeError {
    #[error("ffprobe not found on PATH. Install ffmpeg and try again.")]
    ToolMissing,
}

// ffprobe JSON output structures (only the fields we read).

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}
