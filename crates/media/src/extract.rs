//! Running an extraction end to end: finding `ffmpeg`, checking paths,
//! building the command, running it and counting what it wrote.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::command::{CommandVector, FFMPEG, build_ffmpeg_cmd};
use crate::options::ExtractionOptions;
use crate::runner::ToolRunner;

/// The outcome of an extraction that got as far as building its command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// ffmpeg's exit code (`0` for a dry run).
    pub exit_code: i32,
    /// How many frames ended up in the output directory. Always `0` for a dry
    /// run or when ffmpeg failed.
    pub frame_count: usize,
    pub command: CommandVector,
}

impl ExtractionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// The steps of an extraction, reported as they start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage<'a> {
    /// Inputs were validated and the command is being built.
    Assembling,
    CommandReady(&'a CommandVector),
    /// The command won't be run.
    DryRun,
    /// ffmpeg is about to start.
    Executing,
}

/// The same as [extract_with_progress] without progress reports.
pub fn extract(
    options: &ExtractionOptions,
    runner: &impl ToolRunner,
) -> Result<ExtractionResult, ExtractError> {
    extract_with_progress(options, runner, |_| {})
}

/// Extract frames as described by `options`.
///
/// Everything is validated before anything touches the filesystem. A dry run
/// stops once the command is built. Otherwise the output directory is created
/// (with parents), ffmpeg runs to completion with this process's stdio, and
/// its exit code is passed through untouched. A process killed by a signal is
/// reported as exit code `1`.
pub fn extract_with_progress<F>(
    options: &ExtractionOptions,
    runner: &impl ToolRunner,
    mut on_stage: F,
) -> Result<ExtractionResult, ExtractError>
where
    F: FnMut(Stage<'_>),
{
    let ffmpeg = runner.locate(FFMPEG).ok_or(ExtractError::ToolMissing)?;
    validate_paths(options.input(), options.output_dir())?;

    on_stage(Stage::Assembling);
    let command = build_ffmpeg_cmd(options);
    on_stage(Stage::CommandReady(&command));

    if options.dry_run() {
        on_stage(Stage::DryRun);
        return Ok(ExtractionResult {
            exit_code: 0,
            frame_count: 0,
            command,
        });
    }

    let output_dir = match options.output_dir() {
        dir if dir.as_os_str().is_empty() => Path::new("."),
        dir => dir,
    };
    fs::create_dir_all(output_dir).map_err(|source| ExtractError::CreateOutputDir {
        path: output_dir.to_owned(),
        source,
    })?;

    on_stage(Stage::Executing);
    util::debug_log_info!("Running: {command}");
    let exit_code = runner
        .run(&ffmpeg, command.args())
        .map_err(ExtractError::Spawn)?
        .unwrap_or(1);

    if exit_code != 0 {
        util::debug_log_warning!("ffmpeg exited with code {exit_code}.");
        return Ok(ExtractionResult {
            exit_code,
            frame_count: 0,
            command,
        });
    }

    let frame_count = count_frames(output_dir, &options.pattern().glob())?;
    Ok(ExtractionResult {
        exit_code,
        frame_count,
        command,
    })
}

/// Check that `input` is a readable file and that `output_dir` either is a
/// writable directory or can be created in one. Both have to be valid UTF-8.
pub fn validate_paths(input: &Path, output_dir: &Path) -> Result<(), PathError> {
    for path in [input, output_dir] {
        if path.to_str().is_none() {
            return Err(PathError::NotUtf8(path.to_owned()));
        }
    }

    if !input.is_file() {
        return Err(PathError::InputNotFound(input.to_owned()));
    }
    if !util::access::is_readable(input) {
        return Err(PathError::InputNotReadable(input.to_owned()));
    }

    let output_exists = output_dir.exists();
    if output_exists && !output_dir.is_dir() {
        return Err(PathError::OutputNotDirectory(output_dir.to_owned()));
    }

    let parent = if output_exists {
        output_dir
    } else {
        match output_dir.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    };

    if !parent.is_dir() {
        return Err(PathError::ParentMissing(parent.to_owned()));
    }
    if !util::access::is_writable(parent) {
        return Err(PathError::ParentNotWritable(parent.to_owned()));
    }

    Ok(())
}

/// Count the regular files directly inside `dir` whose names match `glob`.
fn count_frames(dir: &Path, glob: &str) -> Result<usize, ExtractError> {
    let read_dir_error = |source| ExtractError::ReadOutputDir {
        path: dir.to_owned(),
        source,
    };

    let Ok(matcher) = glob::Pattern::new(glob) else {
        util::debug_log_error!("Bad frame glob `{glob}`.");
        return Ok(0);
    };

    let mut count = 0;
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        let is_file = entry.file_type().is_ok_and(|t| t.is_file());
        if is_file && matcher.matches(&entry.file_name().to_string_lossy()) {
            count += 1;
        }
    }
    Ok(count)
}

/// A problem with the input file or output directory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Path is not valid UTF-8: {}", .0.display())]
    NotUtf8(PathBuf),
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("Input file is not readable: {}", .0.display())]
    InputNotReadable(PathBuf),
    #[error("Output path exists but is not a directory: {}", .0.display())]
    OutputNotDirectory(PathBuf),
    #[error("Parent directory does not exist: {}", .0.display())]
    ParentMissing(PathBuf),
    #[error("Parent directory is not writable: {}", .0.display())]
    ParentNotWritable(PathBuf),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("ffmpeg not found on PATH. Install it and try again.")]
    ToolMissing,
    #[error(transparent)]
    InvalidPath(#[from] PathError),
    #[error("Failed to create output directory {}: {source}", path.display())]
    CreateOutputDir { path: PathBuf, source: io::Error },
    #[error("Failed to run ffmpeg: {0}")]
    Spawn(io::Error),
    #[error("Failed to read output directory {}: {source}", path.display())]
    ReadOutputDir { path: PathBuf, source: io::Error },
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::OutputPattern;
    use crate::runner::MockToolRunner;

    /// A temp dir holding a fake input video.
    fn fixture() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clip.mp4");
        fs::write(&input, b"not really a video").unwrap();
        (dir, input)
    }

    fn runner_with_ffmpeg() -> MockToolRunner {
        let mut runner = MockToolRunner::new();
        runner
            .expect_locate()
            .withf(|tool| tool == FFMPEG)
            .return_const(Some(PathBuf::from("/usr/bin/ffmpeg")));
        runner
    }

    #[test]
    fn dry_run_touches_nothing() {
        let (dir, input) = fixture();
        let output = dir.path().join("frames");

        let mut runner = runner_with_ffmpeg();
        runner.expect_run().never();

        let mut stages = Vec::new();
        let options = ExtractionOptions::new(&input, &output).with_dry_run(true);
        let result = extract_with_progress(&options, &runner, |stage| {
            stages.push(match stage {
                Stage::Assembling => "assembling",
                Stage::CommandReady(_) => "ready",
                Stage::DryRun => "dry-run",
                Stage::Executing => "executing",
            })
        })
        .unwrap();

        assert_eq!(result.exit_code, 0);
        assert_eq!(result.frame_count, 0);
        assert_eq!(result.command, build_ffmpeg_cmd(&options));
        assert_eq!(stages, ["assembling", "ready", "dry-run"]);
        assert!(!output.exists());
    }

    #[test]
    fn successful_run_counts_matching_frames() {
        let (dir, input) = fixture();
        let output = dir.path().join("nested").join("frames");
        fs::create_dir(dir.path().join("nested")).unwrap();

        let mut runner = runner_with_ffmpeg();
        let frames_dir = output.clone();
        runner
            .expect_run()
            .withf(|program, args| {
                program == Path::new("/usr/bin/ffmpeg") && args[0] == "-hide_banner"
            })
            .times(1)
            .returning(move |_, _| {
                for name in ["frame_000001.jpg", "frame_000002.jpg", "notes.txt"] {
                    fs::write(frames_dir.join(name), b"").unwrap();
                }
                fs::create_dir(frames_dir.join("frame_dir.jpg")).unwrap();
                Ok(Some(0))
            });

        let result = extract(&ExtractionOptions::new(&input, &output), &runner).unwrap();
        assert!(result.success());
        assert_eq!(result.frame_count, 2);
    }

    #[test]
    fn exit_codes_pass_through() {
        let (dir, input) = fixture();
        let options = ExtractionOptions::new(&input, dir.path().join("frames"))
            .with_pattern(OutputPattern::parse("img_%d.png").unwrap());

        let mut runner = runner_with_ffmpeg();
        runner.expect_run().times(1).returning(|_, _| Ok(Some(183)));
        let result = extract(&options, &runner).unwrap();
        assert_eq!((result.exit_code, result.frame_count), (183, 0));

        let mut runner = runner_with_ffmpeg();
        runner.expect_run().times(1).returning(|_, _| Ok(None));
        assert_eq!(extract(&options, &runner).unwrap().exit_code, 1);
    }

    #[test]
    fn spawn_failures_are_errors() {
        let (dir, input) = fixture();
        let mut runner = runner_with_ffmpeg();
        runner
            .expect_run()
            .returning(|_, _| Err(io::Error::new(io::ErrorKind::PermissionDenied, "nope")));

        let result = extract(&ExtractionOptions::new(&input, dir.path()), &runner);
        assert!(matches!(result, Err(ExtractError::Spawn(_))));
    }

    #[test]
    fn missing_ffmpeg_is_checked_first() {
        let mut runner = MockToolRunner::new();
        runner.expect_locate().return_const(None::<PathBuf>);
        runner.expect_run().never();

        let options = ExtractionOptions::new("/does/not/exist.mp4", "out");
        assert!(matches!(
            extract(&options, &runner),
            Err(ExtractError::ToolMissing)
        ));
    }

    #[test]
    fn bad_paths_stop_before_running() {
        let (dir, input) = fixture();
        let mut runner = runner_with_ffmpeg();
        runner.expect_run().never();

        let missing = dir.path().join("missing.mp4");
        assert!(matches!(
            extract(&ExtractionOptions::new(&missing, dir.path()), &runner),
            Err(ExtractError::InvalidPath(PathError::InputNotFound(_)))
        ));

        // A directory as input.
        assert!(matches!(
            extract(&ExtractionOptions::new(dir.path(), dir.path()), &runner),
            Err(ExtractError::InvalidPath(PathError::InputNotFound(_)))
        ));

        // A file as the output directory.
        assert!(matches!(
            extract(&ExtractionOptions::new(&input, &input), &runner),
            Err(ExtractError::InvalidPath(PathError::OutputNotDirectory(_)))
        ));

        let orphan = dir.path().join("a").join("b");
        assert_eq!(
            validate_paths(&input, &orphan),
            Err(PathError::ParentMissing(dir.path().join("a")))
        );
    }

    #[test]
    fn relative_output_uses_the_current_directory() {
        let (_dir, input) = fixture();
        assert_eq!(validate_paths(&input, Path::new("frames-not-here-yet")), Ok(()));
    }

    #[test]
    fn empty_output_dir_counts_frames_in_the_current_directory() {
        let (_dir, input) = fixture();
        let options = ExtractionOptions::new(&input, "")
            .with_pattern(OutputPattern::parse("empty_output_dir_%06d.jpg").unwrap());
        let written = Path::new("empty_output_dir_000001.jpg");

        let mut runner = runner_with_ffmpeg();
        runner
            .expect_run()
            .withf(|_, args| {
                args.last().map(String::as_str) == Some("empty_output_dir_%06d.jpg")
            })
            .times(1)
            .returning(move |_, _| {
                fs::write(written, b"").unwrap();
                Ok(Some(0))
            });

        let result = extract(&options, &runner);
        fs::remove_file(written).unwrap();
        assert_eq!(result.unwrap().frame_count, 1);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_paths_are_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let (dir, input) = fixture();
        let odd_input = dir.path().join(OsStr::from_bytes(b"clip\xff.mp4"));
        fs::write(&odd_input, b"").unwrap();
        let odd_output = dir.path().join(OsStr::from_bytes(b"frames\xfe"));

        assert_eq!(
            validate_paths(&odd_input, dir.path()),
            Err(PathError::NotUtf8(odd_input.clone()))
        );
        assert_eq!(
            validate_paths(&input, &odd_output),
            Err(PathError::NotUtf8(odd_output.clone()))
        );

        let mut runner = runner_with_ffmpeg();
        runner.expect_run().never();
        assert!(matches!(
            extract(&ExtractionOptions::new(&input, &odd_output), &runner),
            Err(ExtractError::InvalidPath(PathError::NotUtf8(_)))
        ));
        assert!(!odd_output.exists());
    }

    #[cfg(unix)]
    #[test]
    fn read_only_parent_is_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, input) = fixture();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Root ignores permission bits.
        if util::access::is_writable(&locked) {
            return;
        }

        let result = validate_paths(&input, &locked.join("frames"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(result, Err(PathError::ParentNotWritable(locked)));
    }
}
