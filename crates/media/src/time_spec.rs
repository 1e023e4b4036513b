//! Defines [TimeSpec], a validated point in a video given either as plain
//! seconds (`12.5`) or as a clock time (`00:01:05.25`).

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Hours are 1-2 digits, minutes and seconds exactly 2, the fraction 1-3.
static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2}):([0-9]{2}):([0-9]{2})(?:\.([0-9]{1,3}))?$")
        .expect("The regex is valid.")
});

/// A validated time value.
///
/// The text the user typed is kept verbatim (it's what gets handed to ffmpeg)
/// alongside the number of seconds it represents, which is never negative.
///
/// ```
/// use media::TimeSpec;
///
/// let t = TimeSpec::parse("00:01:05.25").unwrap();
/// assert_eq!(t.as_str(), "00:01:05.25");
/// assert!((t.seconds() - 65.25).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSpec {
    text: String,
    seconds: f64,
}

impl TimeSpec {
    /// Validate `text` as either a non-negative decimal number of seconds or an
    /// `H(H):MM:SS[.fff]` clock time.
    pub fn parse(text: &str) -> Result<Self, TimeSpecError> {
        let seconds = match text.parse::<f64>() {
            Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => seconds,
            Ok(_) => return Err(TimeSpecError::invalid(text)),
            Err(_) => clock_seconds(text).ok_or_else(|| TimeSpecError::invalid(text))?,
        };

        Ok(Self {
            text: text.to_owned(),
            seconds,
        })
    }

    /// The original text, unchanged.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The time in seconds.
    pub fn seconds(&self) -> f64 {
        self.seconds
    }
}

impl FromStr for TimeSpec {
    type Err = TimeSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for TimeSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Shorthand for `TimeSpec::parse(text).map(|t| t.seconds())`.
pub fn time_to_seconds(text: &str) -> Result<f64, TimeSpecError> {
    TimeSpec::parse(text).map(|t| t.seconds())
}

fn clock_seconds(text: &str) -> Option<f64> {
    let caps = CLOCK_RE.captures(text)?;

    let hours: u32 = caps[1].parse().ok()?;
    let minutes: u32 = caps[2].parse().ok()?;
    let seconds: u32 = caps[3].parse().ok()?;
    if minutes > 59 || seconds > 59 {
        return None;
    }

    let fraction = match caps.get(4) {
        Some(digits) => format!("0.{}", digits.as_str()).parse::<f64>().ok()?,
        None => 0.0,
    };

    Some(f64::from(hours * 3600 + minutes * 60 + seconds) + fraction)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeSpecError {
    #[error("time must be seconds (e.g., 12.5) or HH:MM:SS[.ms] (e.g., 00:01:05.25)")]
    InvalidFormat { value: String },
}

impl TimeSpecError {
    fn invalid(value: &str) -> Self {
        TimeSpecError::InvalidFormat {
            value: value.to_owned(),
        }
    }

    /// The text that was rejected.
    pub fn value(&self) -> &str {
        match self {
            TimeSpecError::InvalidFormat { value } => value,
        }
    }
}
