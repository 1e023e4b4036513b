//! Defines [OutputPattern], the printf-style file name template ffmpeg writes
//! each extracted frame to (e.g. `frame_%06d.jpg`).

use std::fmt::{self, Display, Formatter};
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// The pattern used when none is given.
pub const DEFAULT_PATTERN: &str = "frame_%06d.jpg";

/// Matches a frame number placeholder (`%d`, `%5d`, `%06d`, ...).
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%([0-9]{0,3})d").expect("The regex is valid."));

/// The image formats frames can be written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// The extension new patterns get for this format (with the dot).
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => ".jpg",
            ImageFormat::Png => ".png",
        }
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            ".jpg" | ".jpeg" => Some(ImageFormat::Jpeg),
            ".png" => Some(ImageFormat::Png),
            _ => None,
        }
    }
}

/// A validated output file name pattern.
///
/// It's a bare file name (no directories), ends in `.jpg`, `.jpeg` or `.png`
/// (any case) and has exactly one placeholder for the frame number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPattern {
    text: String,
    /// Where the placeholder starts and ends in `text`.
    placeholder: (usize, usize),
    /// Minimum number of digits the frame number is padded to.
    width: usize,
    format: ImageFormat,
}

impl OutputPattern {
    /// Validate `text`. Directory components are checked first, then the
    /// extension, then the placeholder.
    pub fn parse(text: &str) -> Result<Self, PatternError> {
        if text.contains(['/', '\\']) || Path::new(text).is_absolute() {
            return Err(PatternError::HasDirectory {
                pattern: text.to_owned(),
            });
        }

        let ext = lowercase_extension(text);
        let format = ImageFormat::from_extension(&ext)
            .ok_or(PatternError::UnsupportedExtension { ext })?;

        let mut placeholders = PLACEHOLDER_RE.captures_iter(text);
        let caps = placeholders.next().ok_or(PatternError::MissingPlaceholder)?;
        if placeholders.next().is_some() {
            return Err(PatternError::MultiplePlaceholders);
        }

        let whole = caps.get(0).expect("Capture 0 is the whole match.");
        let width = caps[1].parse().unwrap_or(0);

        Ok(Self {
            text: text.to_owned(),
            placeholder: (whole.start(), whole.end()),
            width,
            format,
        })
    }

    /// The pattern exactly as given.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Whether frames will be written as JPEGs.
    pub fn is_jpeg(&self) -> bool {
        self.format == ImageFormat::Jpeg
    }

    /// A glob matching every file this pattern can produce. The placeholder
    /// becomes `*` and everything else is escaped.
    ///
    /// ```
    /// use media::OutputPattern;
    ///
    /// let pattern = OutputPattern::parse("frame_%06d.jpg").unwrap();
    /// assert_eq!(pattern.glob(), "frame_*.jpg");
    /// ```
    pub fn glob(&self) -> String {
        let (prefix, suffix) = self.surrounding();
        format!(
            "{}*{}",
            glob::Pattern::escape(prefix),
            glob::Pattern::escape(suffix)
        )
    }

    /// The file name ffmpeg gives frame number `index` (frames count from 1).
    /// A width in the placeholder zero-pads the number the way ffmpeg does, so
    /// `%5d` and `%05d` are the same.
    pub fn file_name(&self, index: u64) -> String {
        let (prefix, suffix) = self.surrounding();
        format!("{prefix}{index:0width$}{suffix}", width = self.width)
    }

    /// The same pattern with its extension swapped for `format`'s.
    pub fn with_format(&self, format: ImageFormat) -> Self {
        if format == self.format {
            return self.clone();
        }

        let ext_len = lowercase_extension(&self.text).len();
        let stem = &self.text[..self.text.len() - ext_len];
        let text = format!("{stem}{}", format.extension());

        // The placeholder and name are untouched so the result is still valid.
        Self {
            text,
            format,
            ..self.clone()
        }
    }

    fn surrounding(&self) -> (&str, &str) {
        let (start, end) = self.placeholder;
        (&self.text[..start], &self.text[end..])
    }
}

impl Default for OutputPattern {
    fn default() -> Self {
        Self::parse(DEFAULT_PATTERN).expect("The default pattern is valid.")
    }
}

impl FromStr for OutputPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for OutputPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Replace every frame number placeholder in a raw pattern with `*`. Nothing
/// is validated or escaped. Also see [OutputPattern::glob].
pub fn pattern_to_glob(pattern: &str) -> String {
    PLACEHOLDER_RE.replace_all(pattern, "*").into_owned()
}

/// The extension (with the dot) in lowercase, or an empty string.
fn lowercase_extension(text: &str) -> String {
    Path::new(text)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Pattern must be a file name without directories: {pattern}")]
    HasDirectory { pattern: String },
    #[error("Unsupported pattern extension '{ext}'. Use one of: .jpg, .jpeg, .png")]
    UnsupportedExtension { ext: String },
    #[error("Pattern needs a frame number placeholder such as %06d")]
    MissingPlaceholder,
    #[error("Pattern must have exactly one frame number placeholder")]
    MultiplePlaceholders,
}
