//! Contains [Args], which are parsed command-line flags.

use clap::Parser;

/// Parsed command line arguments.
#[derive(Parser, Debug, Clone, PartialEq, Eq, Hash)]
#[command(
    name = "framegrab-gui",
    version = util::version::APP_VERSION,
    about = "Extract frames from a video via ffmpeg (desktop UI)."
)]
pub struct Args {
    /// Start from the default form values instead of the saved preferences.
    /// They're overwritten when the UI closes.
    #[arg(long)]
    pub reset_preferences: bool,

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

impl Default for Args {
    fn default() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        let args = Args::try_parse_from(["framegrab-gui"]).unwrap();
        assert!(!args.reset_preferences);

        let args = Args::try_parse_from(["framegrab-gui", "--reset-preferences"]).unwrap();
        assert!(args.reset_preferences);

        assert!(Args::try_parse_from(["framegrab-gui", "clip.mp4"]).is_err());
    }
}
