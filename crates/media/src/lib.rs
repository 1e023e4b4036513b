//! This library contains everything the front ends share for extracting
//! frames with ffmpeg: validating user input, probing the source, building the
//! command and running it.

pub mod command;
pub mod estimate;
pub mod extract;
pub mod frame_rate;
pub mod options;
pub mod pattern;
pub mod probe;
pub mod runner;
pub mod source;
pub mod time_spec;

pub use command::{CommandVector, FFMPEG, build_ffmpeg_cmd};
pub use estimate::{PatternPreview, estimate_frames, fps_ceiling, pattern_preview};
pub use extract::{
    ExtractError, ExtractionResult, PathError, Stage, extract, extract_with_progress,
    validate_paths,
};
pub use frame_rate::{FrameRate, FrameRateError};
pub use options::ExtractionOptions;
pub use pattern::{DEFAULT_PATTERN, ImageFormat, OutputPattern, PatternError, pattern_to_glob};
pub use probe::{ProbeError, probe};
pub use runner::{Captured, SystemRunner, ToolRunner};
pub use source::{Dimensions, SourceInfo};
pub use time_spec::{TimeSpec, TimeSpecError, time_to_seconds};
