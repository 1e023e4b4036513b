//! Contains tools for dealing with [serde] (specifically [serde_json])
//! serialization/deserialization to files (mainly by providing a simpler
//! [SavedFile] API).

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use thiserror::Error;

/// Gives an object a nice API for saving/reading from a file. This trait is
/// blanket implemented for all types that meet the requirements.
pub trait SavedFile: Serialize + DeserializeOwned {
    /// Save data to disk, replacing whatever was there.
    ///
    /// The data is written to a sibling temporary file first and then renamed
    /// over the destination, so a crash mid-write leaves the old file intact.
    fn save_to_path<P: AsRef<Path>>(&self, file_path: P) -> Result<(), SavedFileError> {
        let file_path = file_path.as_ref();
        crate::debug_log_info!("Writing saved file `{}`.", file_path.display());

        let tmp_path = file_path.with_extension("json.tmp");
        let mut writer = BufWriter::new(File::create(&tmp_path)?);

        // We'll pretty print if we're in debug mode.
        if cfg!(debug_assertions) {
            serde_json::to_writer_pretty(&mut writer, self)
        } else {
            serde_json::to_writer(&mut writer, self)
        }?;
        writer.flush()?;
        drop(writer);

        fs::rename(&tmp_path, file_path).inspect_err(|e| {
            crate::debug_log_warning!("Failed to move saved file into place: {e}");
        })?;
        Ok(())
    }

    /// Read data from disk.
    fn read_from_path<P: AsRef<Path>>(file_path: P) -> Result<Self, SavedFileError> {
        let file = File::open(file_path.as_ref())?;
        serde_json::from_reader(BufReader::new(file))
            .inspect_err(|e| crate::debug_log_warning!("Failed to deserialize file: {e}"))
            .map_err(Into::into)
    }

    /// The same as [SavedFile::read_from_path], but [Default::default] is
    /// returned when the file is missing or can't be read. Corrupt files are
    /// left on disk untouched until the next save overwrites them.
    fn read_from_path_or_default<P>(file_path: P) -> Self
    where
        P: AsRef<Path>,
        Self: Default,
    {
        match Self::read_from_path(file_path) {
            Ok(data) => data,
            Err(SavedFileError::IoError(e)) if e.kind() == io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(e) => {
                crate::debug_log_warning!("Saved file unreadable, using defaults: {e}");
                Self::default()
            }
        }
    }
}

impl<T: Serialize + DeserializeOwned> SavedFile for T {}

/// Indicates that something went wrong trying to serialize or deserialize.
#[derive(Error, Debug)]
pub enum SavedFileError {
    #[error(transparent)]
    BadData(serde_json::Error),
    #[error(transparent)]
    IoError(#[from] io::Error),
}

impl From<serde_json::Error> for SavedFileError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            SavedFileError::IoError(e.into())
        } else {
            SavedFileError::BadData(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
    struct Sample {
        name: String,
        #[serde(default)]
        count: u32,
    }

    #[test]
    fn saved_data_can_be_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.json");

        let sample = Sample {
            name: "frames".into(),
            count: 3,
        };
        sample.save_to_path(&path).unwrap();

        assert_eq!(Sample::read_from_path(&path).unwrap(), sample);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");

        assert_eq!(Sample::read_from_path_or_default(&path), Sample::default());
        assert!(matches!(
            Sample::read_from_path(&path),
            Err(SavedFileError::IoError(_))
        ));
    }

    #[test]
    fn corrupt_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            Sample::read_from_path(&path),
            Err(SavedFileError::BadData(_))
        ));
        assert_eq!(Sample::read_from_path_or_default(&path), Sample::default());
    }

    #[test]
    fn missing_fields_use_serde_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{ "name": "x" }"#).unwrap();

        let sample = Sample::read_from_path(&path).unwrap();
        assert_eq!(sample.count, 0);
    }
}
