//! Defines constants related to the app's name and version.

/// The name of the app.
pub const APP_NAME: &str = "Frame Extractor";

/// The version of the app (shared by every crate in the workspace).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A one-line blurb for `--help` output and the about dialog.
pub const APP_ABOUT: &str = "Extract still frames from a video with ffmpeg.";
