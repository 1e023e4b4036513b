//! Contains [Args], which are parsed command-line flags.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use media::{
    DEFAULT_PATTERN, ExtractionOptions, FFMPEG, FrameRate, FrameRateError, OutputPattern,
    PathError, PatternError, TimeSpec, TimeSpecError, ToolRunner,
};

/// Parsed command line arguments.
///
/// Times, the frame rate and the pattern are kept as text here and validated
/// by [Args::to_options] so every bad value exits with code `1`.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "framegrab",
    version = util::version::APP_VERSION,
    about = "Extract frames from a video via ffmpeg.",
    long_about = "Extract frames from a video via ffmpeg. Use --dry-run to only print the \
                  constructed ffmpeg command."
)]
pub struct Args {
    /// Path to input video file.
    pub input_video: PathBuf,

    /// Directory for extracted frames.
    pub output_dir: PathBuf,

    /// Start time (sec or HH:MM:SS[.ms]).
    #[arg(long, allow_hyphen_values = true)]
    pub start: Option<String>,

    /// End time (sec or HH:MM:SS[.ms]).
    #[arg(long, allow_hyphen_values = true)]
    pub end: Option<String>,

    /// Sample at fixed frames per second.
    #[arg(long, allow_hyphen_values = true)]
    pub fps: Option<String>,

    /// Output filename pattern (.jpg/.jpeg/.png), e.g., frame_%06d.jpg.
    #[arg(long, default_value = DEFAULT_PATTERN)]
    pub pattern: String,

    /// Overwrite existing output files (ffmpeg -y).
    #[arg(long)]
    pub overwrite: bool,

    /// Print more details while preparing and running the command.
    #[arg(long)]
    pub verbose: bool,

    /// Do not execute ffmpeg; only print the constructed command.
    #[arg(long)]
    pub dry_run: bool,

    #[cfg(debug_assertions)]
    /// Disable debug logging. This option only exists if `debug_assertions` are
    /// enabled.
    #[arg(long)]
    pub no_debug_logging: bool,

    #[cfg(debug_assertions)]
    /// Enable debug error log panics. This option only exists if
    /// `debug_assertions` are enabled.
    #[arg(long, conflicts_with = "no_debug_logging")]
    pub debug_error_log_panics: bool,
}

impl Args {
    /// Validate everything and build the extraction options.
    ///
    /// The first failure is reported, checked in this order: times and frame
    /// rate, `ffmpeg` being installed, the paths, then the pattern.
    pub fn to_options(&self, runner: &impl ToolRunner) -> Result<ExtractionOptions, ArgError> {
        let start = self
            .start
            .as_deref()
            .map(TimeSpec::parse)
            .transpose()
            .map_err(ArgError::Start)?;
        let end = self
            .end
            .as_deref()
            .map(TimeSpec::parse)
            .transpose()
            .map_err(ArgError::End)?;
        let fps = self
            .fps
            .as_deref()
            .map(FrameRate::parse)
            .transpose()
            .map_err(ArgError::Fps)?;

        if runner.locate(FFMPEG).is_none() {
            return Err(ArgError::ToolMissing);
        }
        media::validate_paths(&self.input_video, &self.output_dir)?;

        let pattern = OutputPattern::parse(&self.pattern).map_err(ArgError::Pattern)?;

        Ok(ExtractionOptions::new(&self.input_video, &self.output_dir)
            .with_start(start)
            .with_end(end)
            .with_fps(fps)
            .with_pattern(pattern)
            .with_overwrite(self.overwrite)
            .with_verbose(self.verbose)
            .with_dry_run(self.dry_run))
    }
}

/// A flag value that parsed fine but isn't valid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgError {
    #[error("argument --start: {0}")]
    Start(TimeSpecError),
    #[error("argument --end: {0}")]
    End(TimeSpecError),
    #[error("argument --fps: {0}")]
    Fps(FrameRateError),
    #[error("ffmpeg not found on PATH. Install it and try again.")]
    ToolMissing,
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("{0}")]
    Pattern(PatternError),
}
