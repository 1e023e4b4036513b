//! Defines [ExtractionOptions], everything needed to describe one extraction
//! run.

use std::path::{Path, PathBuf};

use crate::frame_rate::FrameRate;
use crate::pattern::OutputPattern;
use crate::time_spec::TimeSpec;

/// The validated inputs to an extraction. Built with the consuming `with_*`
/// methods and read-only afterwards.
///
/// ```
/// use media::{ExtractionOptions, FrameRate};
///
/// let options = ExtractionOptions::new("clip.mp4", "frames")
///     .with_fps(FrameRate::new(2.0).unwrap())
///     .with_dry_run(true);
/// assert!(options.dry_run());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOptions {
    input: PathBuf,
    output_dir: PathBuf,
    start: Option<TimeSpec>,
    end: Option<TimeSpec>,
    fps: Option<FrameRate>,
    pattern: OutputPattern,
    overwrite: bool,
    verbose: bool,
    dry_run: bool,
}

impl ExtractionOptions {
    /// Options with the default pattern and every flag off.
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            start: None,
            end: None,
            fps: None,
            pattern: OutputPattern::default(),
            overwrite: false,
            verbose: false,
            dry_run: false,
        }
    }

    pub fn with_start(self, start: Option<TimeSpec>) -> Self {
        Self { start, ..self }
    }

    pub fn with_end(self, end: Option<TimeSpec>) -> Self {
        Self { end, ..self }
    }

    pub fn with_fps(self, fps: impl Into<Option<FrameRate>>) -> Self {
        Self {
            fps: fps.into(),
            ..self
        }
    }

    pub fn with_pattern(self, pattern: OutputPattern) -> Self {
        Self { pattern, ..self }
    }

    /// Replace existing frames (`-y`) instead of skipping them (`-n`).
    pub fn with_overwrite(self, overwrite: bool) -> Self {
        Self { overwrite, ..self }
    }

    /// Let ffmpeg log at `info` level instead of `error`.
    pub fn with_verbose(self, verbose: bool) -> Self {
        Self { verbose, ..self }
    }

    /// Only build the command, never run it.
    pub fn with_dry_run(self, dry_run: bool) -> Self {
        Self { dry_run, ..self }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn start(&self) -> Option<&TimeSpec> {
        self.start.as_ref()
    }

    pub fn end(&self) -> Option<&TimeSpec> {
        self.end.as_ref()
    }

    pub fn fps(&self) -> Option<FrameRate> {
        self.fps
    }

    pub fn pattern(&self) -> &OutputPattern {
        &self.pattern
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}
