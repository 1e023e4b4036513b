//! Defines [ToolRunner], the seam between the core and the external `ffmpeg`
//! and `ffprobe` executables, and [SystemRunner], the real implementation.

use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// The output of a process whose stdout was captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    pub stdout: String,
    /// Whether the process exited with a zero exit code.
    pub success: bool,
}

/// Finds and runs external tools.
#[cfg_attr(test, mockall::automock)]
pub trait ToolRunner {
    /// The full path of `tool` (e.g. `"ffmpeg"`) if it can be found.
    fn locate(&self, tool: &str) -> Option<PathBuf>;

    /// Run `program` to completion with the current process's stdio. The exit
    /// code is returned, or [None] if the process was killed by a signal.
    fn run(&self, program: &Path, args: &[String]) -> io::Result<Option<i32>>;

    /// Run `program` to completion and capture its stdout. Stderr is discarded.
    fn capture(&self, program: &Path, args: &[String]) -> io::Result<Captured>;
}

/// Looks tools up on `PATH` and runs them with [Command].
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    /// Used instead of the `PATH` environment variable when set.
    search_path: Option<OsString>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// A runner that searches `search_path` (formatted like `PATH`) instead of
    /// the real `PATH`.
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }
}

impl ToolRunner for SystemRunner {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        let search_path = self.search_path.clone().or_else(|| env::var_os("PATH"))?;

        env::split_paths(&search_path)
            .filter(|dir| !dir.as_os_str().is_empty())
            .flat_map(|dir| candidate_names(tool).map(move |name| dir.join(name)))
            .find(|candidate| is_executable(candidate))
    }

    fn run(&self, program: &Path, args: &[String]) -> io::Result<Option<i32>> {
        util::debug_log_info!("Running `{}` with {} args.", program.display(), args.len());
        let status = Command::new(program).args(args).status()?;
        Ok(status.code())
    }

    fn capture(&self, program: &Path, args: &[String]) -> io::Result<Captured> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()?;

        Ok(Captured {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            success: output.status.success(),
        })
    }
}

/// The file names `tool` may have on disk.
fn candidate_names(tool: &str) -> impl Iterator<Item = String> + '_ {
    let with_exe = (cfg!(windows) && Path::new(tool).extension().is_none())
        .then(|| format!("{tool}.exe"));
    std::iter::once(tool.to_owned()).chain(with_exe)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn missing_tools_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let runner = SystemRunner::with_search_path(dir.path());
        assert_eq!(runner.locate("ffmpeg"), None);

        let runner = SystemRunner::with_search_path("");
        assert_eq!(runner.locate("ffmpeg"), None);
    }

    #[cfg(unix)]
    #[test]
    fn only_executables_are_found() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("ffprobe");
        fs::write(&tool, "#!/bin/sh\n").unwrap();

        let runner = SystemRunner::with_search_path(dir.path());
        assert_eq!(runner.locate("ffprobe"), None);

        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(runner.locate("ffprobe"), Some(tool));
    }

    #[cfg(unix)]
    #[test]
    fn exit_codes_and_output_are_reported() {
        let runner = SystemRunner::new();
        let sh = Path::new("/bin/sh");

        let code = runner.run(sh, &["-c".into(), "exit 3".into()]).unwrap();
        assert_eq!(code, Some(3));

        let captured = runner
            .capture(sh, &["-c".into(), "echo '{}'".into()])
            .unwrap();
        assert_eq!(
            captured,
            Captured {
                stdout: "{}\n".into(),
                success: true,
            }
        );
    }
}
