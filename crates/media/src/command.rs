//! Turning [ExtractionOptions] into the exact `ffmpeg` invocation.

use std::fmt::{self, Display, Formatter};

use crate::options::ExtractionOptions;

/// The name of the extraction tool.
pub const FFMPEG: &str = "ffmpeg";

/// JPEG quality passed with `-q:v` (2 is near the best ffmpeg offers).
const JPEG_QUALITY: &str = "2";

/// A complete command line: the program name followed by its arguments. It's
/// never modified after being built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandVector(Vec<String>);

impl CommandVector {
    /// The program name (always the first element).
    pub fn program(&self) -> &str {
        &self.0[0]
    }

    /// Everything after the program name.
    pub fn args(&self) -> &[String] {
        &self.0[1..]
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Renders the command as a single line that a POSIX shell would split back
/// into the same arguments.
impl Display for CommandVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&shell_quote(part))?;
        }
        Ok(())
    }
}

/// Build the `ffmpeg` command for `options`. The argument order is fixed:
/// log options, `-ss`, `-i`, `-to`, `-vf`, `-q:v`, `-y`/`-n`, then the
/// output path (with the placeholder left for ffmpeg to fill in).
///
/// Paths are converted lossily. [crate::validate_paths] rejects paths that
/// aren't UTF-8 before anything is run.
pub fn build_ffmpeg_cmd(options: &ExtractionOptions) -> CommandVector {
    let log_level = if options.verbose() { "info" } else { "error" };
    let mut cmd: Vec<String> = vec![
        FFMPEG.into(),
        "-hide_banner".into(),
        "-loglevel".into(),
        log_level.into(),
    ];

    if let Some(start) = options.start() {
        cmd.extend(["-ss".into(), start.to_string()]);
    }
    cmd.extend(["-i".into(), options.input().to_string_lossy().into_owned()]);
    if let Some(end) = options.end() {
        cmd.extend(["-to".into(), end.to_string()]);
    }
    if let Some(fps) = options.fps() {
        cmd.extend(["-vf".into(), format!("fps={fps}")]);
    }

    if options.pattern().is_jpeg() {
        cmd.extend(["-q:v".into(), JPEG_QUALITY.into()]);
    }

    cmd.push(if options.overwrite() { "-y" } else { "-n" }.into());

    let output = options.output_dir().join(options.pattern().as_str());
    cmd.push(output.to_string_lossy().into_owned());

    CommandVector(cmd)
}

/// Quote `part` for a POSIX shell. Parts made only of safe characters are left
/// alone; anything else is single quoted.
pub fn shell_quote(part: &str) -> String {
    if part.is_empty() {
        return "''".into();
    }

    let is_safe = |c: char| c.is_ascii_alphanumeric() || "@%+=:,./_-".contains(c);
    if part.chars().all(is_safe) {
        return part.into();
    }

    format!("'{}'", part.replace('\'', r#"'"'"'"#))
}
