//! Defines [SourceInfo], what's known about a source video after probing it.

use std::fmt::{self, Display, Formatter};
use std::num::NonZeroU32;

/// A width and a height, both guaranteed to be non-zero.
///
/// ```
/// use media::Dimensions;
///
/// let d = Dimensions::new(1920, 1080).unwrap();
/// assert_eq!(d.to_string(), "1920x1080");
/// assert!(Dimensions::new(0, 1080).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    width: NonZeroU32,
    height: NonZeroU32,
}

impl Dimensions {
    /// Construct from a width and a height. [None] is returned if either is 0.
    pub const fn new(width: u32, height: u32) -> Option<Self> {
        let Some(width) = NonZeroU32::new(width) else {
            return None;
        };
        let Some(height) = NonZeroU32::new(height) else {
            return None;
        };

        Some(Self { width, height })
    }

    /// The width. This will never be `0`.
    pub const fn width(&self) -> u32 {
        self.width.get()
    }

    /// The height. This will never be `0`.
    pub const fn height(&self) -> u32 {
        self.height.get()
    }
}

impl Display for Dimensions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Metadata about a source video. Every field is optional; a probe that
/// failed produces [SourceInfo::default] (everything unknown).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SourceInfo {
    /// The video stream's frame rate, always positive when known.
    pub fps: Option<f64>,
    /// The container's duration in seconds.
    pub duration: Option<f64>,
    pub dimensions: Option<Dimensions>,
}

impl SourceInfo {
    /// Whether nothing at all is known.
    pub fn is_unknown(&self) -> bool {
        *self == Self::default()
    }

    /// A short human readable description (e.g. `1920x1080, 29.97 fps,
    /// 10.50 s`). Unknown parts are left out, so this is empty when nothing is
    /// known.
    pub fn summary(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if let Some(dimensions) = self.dimensions {
            parts.push(dimensions.to_string());
        }
        if let Some(fps) = self.fps.filter(|fps| *fps > 0.0) {
            parts.push(format!("{fps:.2} fps"));
        }
        if let Some(duration) = self.duration.filter(|d| *d > 0.0) {
            parts.push(format!("{duration:.2} s"));
        }
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_summary() {
        let info = SourceInfo {
            fps: Some(30000.0 / 1001.0),
            duration: Some(10.5),
            dimensions: Dimensions::new(1920, 1080),
        };
        assert_eq!(info.summary(), "1920x1080, 29.97 fps, 10.50 s");
        assert!(!info.is_unknown());
    }

    #[test]
    fn unknown_parts_are_left_out() {
        let info = SourceInfo {
            duration: Some(3.0),
            ..Default::default()
        };
        assert_eq!(info.summary(), "3.00 s");
        assert_eq!(SourceInfo::default().summary(), "");
        assert!(SourceInfo::default().is_unknown());
    }
}
