//! Defines [FrameRate], a sampling rate that's guaranteed to be a positive
//! finite number.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

/// Frames per second. Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FrameRate(f64);

impl FrameRate {
    /// Construct from a raw value, rejecting zero, negatives, NaN and infinity.
    pub fn new(fps: f64) -> Result<Self, FrameRateError> {
        if fps.is_finite() && fps > 0.0 {
            Ok(Self(fps))
        } else {
            Err(FrameRateError::NotPositive)
        }
    }

    /// Parse user input (e.g. `"2"`, `"29.97"`).
    pub fn parse(text: &str) -> Result<Self, FrameRateError> {
        let fps = text
            .trim()
            .parse::<f64>()
            .map_err(|_| FrameRateError::NotANumber)?;
        Self::new(fps)
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl FromStr for FrameRate {
    type Err = FrameRateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Prints the value the way it's handed to ffmpeg (`2`, `29.97`).
impl Display for FrameRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRateError {
    #[error("fps must be a number > 0")]
    NotANumber,
    #[error("fps must be > 0")]
    NotPositive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rates_are_accepted_unchanged() {
        for (text, fps) in [("2", 2.0), ("0.5", 0.5), ("29.97", 29.97), ("60", 60.0)] {
            assert_eq!(FrameRate::parse(text).unwrap().get(), fps);
        }
    }

    #[test]
    fn bad_rates_are_rejected() {
        assert_eq!(FrameRate::parse("0"), Err(FrameRateError::NotPositive));
        assert_eq!(FrameRate::parse("-3"), Err(FrameRateError::NotPositive));
        assert_eq!(FrameRate::parse("NaN"), Err(FrameRateError::NotPositive));
        assert_eq!(FrameRate::parse("inf"), Err(FrameRateError::NotPositive));
        assert_eq!(FrameRate::parse("fast"), Err(FrameRateError::NotANumber));
        assert_eq!(FrameRate::parse(""), Err(FrameRateError::NotANumber));
        assert_eq!(FrameRate::new(f64::NAN), Err(FrameRateError::NotPositive));
    }

    #[test]
    fn display_matches_ffmpeg_argument() {
        assert_eq!(FrameRate::new(2.0).unwrap().to_string(), "2");
        assert_eq!(FrameRate::new(0.5).unwrap().to_string(), "0.5");
        assert_eq!(FrameRate::new(29.97).unwrap().to_string(), "29.97");
    }
}
