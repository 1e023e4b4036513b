//! Functions for finding OS-specific paths to local app data.

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::version;

/// The name of the folder that will store app data.
pub const ROOT_DIR_NAME: &str = version::APP_NAME;

/// The name of the desktop client's preferences file.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// The path to the root of the app's data directory, unique for each user.
///
/// The directory will be created if it doesn't exist.
pub fn root_path() -> Result<PathBuf, LocalDataError> {
    let mut local_data = PathBuf::from(
        env::var_os(LOCAL_DATA_ROOT_ENV_VAR).ok_or(LocalDataError::NoRoot {
            env_var: LOCAL_DATA_ROOT_ENV_VAR,
        })?,
    );
    for dir in LOCAL_APP_DATA_SUFFIX {
        local_data.push(dir);
    }

    if !local_data.is_dir() {
        crate::debug_log_info!("Creating local data dir `{}`.", local_data.display());
        fs::create_dir_all(&local_data).map_err(LocalDataError::CreateDir)?;
    }

    Ok(local_data)
}

/// The path to the desktop client's preferences file. The file itself may not
/// exist yet.
pub fn preferences_path() -> Result<PathBuf, LocalDataError> {
    root_path().map(|root| root.join(PREFERENCES_FILE_NAME))
}

/// Indicates that the app data directory couldn't be found or created.
#[derive(Error, Debug)]
pub enum LocalDataError {
    #[error("Environment variable `{env_var}` isn't set.")]
    NoRoot { env_var: &'static str },
    #[error("Failed to create the local data directory: {0}")]
    CreateDir(io::Error),
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
compile_error!("Unsupported platform.");

#[cfg(target_os = "windows")]
const LOCAL_DATA_ROOT_ENV_VAR: &str = "LOCALAPPDATA";

#[cfg(any(target_os = "macos", target_os = "linux"))]
const LOCAL_DATA_ROOT_ENV_VAR: &str = "HOME";

#[cfg(target_os = "windows")]
const LOCAL_APP_DATA_SUFFIX: &[&str] = &[ROOT_DIR_NAME];

#[cfg(target_os = "macos")]
const LOCAL_APP_DATA_SUFFIX: &[&str] = &["Library", "Application Support", ROOT_DIR_NAME];

#[cfg(target_os = "linux")]
const LOCAL_APP_DATA_SUFFIX: &[&str] = &[".local", "share", ROOT_DIR_NAME];
