//! Contains [Preferences], the form values and settings that are remembered
//! between runs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use media::DEFAULT_PATTERN;
use util::local_data::{self, LocalDataError};
use util::saved_file::{SavedFile, SavedFileError};

/// The color scheme the UI uses.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Follow the OS.
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::System, Theme::Light, Theme::Dark];

    pub fn label(self) -> &'static str {
        match self {
            Theme::System => "System Theme",
            Theme::Light => "Light Theme",
            Theme::Dark => "Dark Theme",
        }
    }

    pub fn egui_preference(self) -> egui::ThemePreference {
        match self {
            Theme::System => egui::ThemePreference::System,
            Theme::Light => egui::ThemePreference::Light,
            Theme::Dark => egui::ThemePreference::Dark,
        }
    }
}

/// Everything the desktop client saves to disk. Values are stored the way
/// they were typed (unvalidated); fields missing from the file take their
/// defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Preferences {
    pub input_video: String,
    pub output_dir: String,
    pub start: String,
    pub end: String,
    pub fps: String,
    pub pattern: String,
    pub overwrite: bool,
    pub verbose: bool,
    pub dry_run: bool,
    pub theme: Theme,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            input_video: String::new(),
            output_dir: String::new(),
            start: String::new(),
            end: String::new(),
            fps: String::new(),
            pattern: DEFAULT_PATTERN.into(),
            overwrite: false,
            verbose: false,
            dry_run: false,
            theme: Theme::default(),
        }
    }
}

impl Preferences {
    /// Read the saved preferences, falling back to the defaults if there are
    /// none or they can't be read.
    pub fn load() -> Self {
        match local_data::preferences_path() {
            Ok(path) => Self::read_from_path_or_default(path),
            Err(e) => {
                util::debug_log_warning!("No preferences path, using defaults: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf, PrefsError> {
        let path = local_data::preferences_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PrefsError {
    #[error(transparent)]
    LocalData(#[from] LocalDataError),
    #[error(transparent)]
    SavedFile(#[from] SavedFileError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let prefs: Preferences =
            serde_json::from_str(r#"{ "input_video": "clip.mp4", "theme": "dark" }"#).unwrap();
        assert_eq!(prefs.input_video, "clip.mp4");
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.pattern, DEFAULT_PATTERN);
        assert!(!prefs.overwrite);
    }

    #[test]
    fn saved_preferences_round_trip_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");

        let prefs = Preferences {
            fps: "2".into(),
            dry_run: true,
            theme: Theme::Light,
            ..Default::default()
        };
        prefs.save_to_path(&path).unwrap();

        assert_eq!(Preferences::read_from_path_or_default(&path), prefs);
    }

    #[test]
    fn themes_are_lowercase_in_json() {
        assert_eq!(serde_json::to_string(&Theme::System).unwrap(), r#""system""#);
        assert!(serde_json::from_str::<Theme>(r#""purple""#).is_err());
    }
}
