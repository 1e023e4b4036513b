//! Permission checks for paths, answered the way the OS would answer them for
//! the current user (not just by looking at permission bits).

use std::path::Path;

/// Whether the current user can read `path`.
pub fn is_readable(path: &Path) -> bool {
    check(path, Mode::Read)
}

/// Whether the current user can write to `path` (for a directory, whether
/// entries can be created in it).
pub fn is_writable(path: &Path) -> bool {
    check(path, Mode::Write)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Read,
    Write,
}

#[cfg(unix)]
fn check(path: &Path, mode: Mode) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    let flag = match mode {
        Mode::Read => libc::R_OK,
        Mode::Write => libc::W_OK,
    };

    // SAFETY: `c_path` is a valid NUL-terminated string that outlives the
    // call, and `access` doesn't keep the pointer around.
    unsafe { libc::access(c_path.as_ptr(), flag) == 0 }
}

#[cfg(not(unix))]
fn check(path: &Path, mode: Mode) -> bool {
    match (mode, path.metadata()) {
        (_, Err(_)) => false,
        (Mode::Read, Ok(_)) => true,
        (Mode::Write, Ok(metadata)) => !metadata.permissions().readonly(),
    }
}
