//! The desktop form's logic, kept apart from the layout: per-field validation,
//! turning the form into [ExtractionOptions], and the estimate, preview and
//! fps clamp shown next to it.

use std::path::PathBuf;

use thiserror::Error;

use media::{
    DEFAULT_PATTERN, ExtractionOptions, FrameRate, ImageFormat, OutputPattern, PatternPreview,
    SourceInfo, TimeSpec,
};

use crate::prefs::Preferences;

/// Shown in place of an estimate or preview that can't be worked out.
pub const UNKNOWN: &str = "\u{2013}";

/// Inline error messages for the fields that are validated as they're typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub start: Option<String>,
    pub end: Option<String>,
    pub fps: Option<String>,
    pub pattern: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Check the start, end, fps and pattern fields. Empty optional fields are
/// fine, and an empty pattern means the default one.
pub fn validate(form: &Preferences) -> FieldErrors {
    const INVALID_TIME: &str = "Invalid time";

    FieldErrors {
        start: optional(&form.start)
            .and_then(|t| TimeSpec::parse(t).err())
            .map(|_| INVALID_TIME.into()),
        end: optional(&form.end)
            .and_then(|t| TimeSpec::parse(t).err())
            .map(|_| INVALID_TIME.into()),
        fps: optional(&form.fps)
            .and_then(|f| FrameRate::parse(f).err())
            .map(|_| "FPS > 0".into()),
        pattern: OutputPattern::parse(pattern_text(form))
            .err()
            .map(|e| e.to_string()),
    }
}

/// Build the options for an extraction. `force_dry_run` overrides the form's
/// own dry-run toggle (used for previews).
pub fn to_options(
    form: &Preferences,
    force_dry_run: bool,
) -> Result<ExtractionOptions, FormError> {
    if !validate(form).is_empty() {
        return Err(FormError::InvalidFields);
    }
    let input = optional(&form.input_video).ok_or(FormError::MissingInput)?;
    let output = optional(&form.output_dir).ok_or(FormError::MissingOutput)?;

    // Validated above so these can't fail.
    let parse_time = |t| TimeSpec::parse(t).map_err(|_| FormError::InvalidFields);
    let start = optional(&form.start).map(parse_time).transpose()?;
    let end = optional(&form.end).map(parse_time).transpose()?;
    let fps = optional(&form.fps)
        .map(|f| FrameRate::parse(f).map_err(|_| FormError::InvalidFields))
        .transpose()?;
    let pattern =
        OutputPattern::parse(pattern_text(form)).map_err(|_| FormError::InvalidFields)?;

    Ok(ExtractionOptions::new(PathBuf::from(input), PathBuf::from(output))
        .with_start(start)
        .with_end(end)
        .with_fps(fps)
        .with_pattern(pattern)
        .with_overwrite(form.overwrite)
        .with_verbose(form.verbose)
        .with_dry_run(form.dry_run || force_dry_run))
}

/// The expected frame count for the current form values, if it can be known.
pub fn estimate(form: &Preferences, source: &SourceInfo) -> Option<u64> {
    let seconds = |t: &str| {
        optional(t)
            .and_then(|t| TimeSpec::parse(t).ok())
            .map(|t| t.seconds())
    };
    let fps = optional(&form.fps).and_then(|f| FrameRate::parse(f).ok());
    media::estimate_frames(source, seconds(&form.start), seconds(&form.end), fps)
}

pub fn estimate_text(estimate: Option<u64>) -> String {
    match estimate {
        Some(n) => format!("~{n} frames"),
        None => UNKNOWN.into(),
    }
}

/// `first … last` file names, just `first` when the count isn't known, or
/// [UNKNOWN] when the pattern is invalid.
pub fn preview_text(form: &Preferences, estimate: Option<u64>) -> String {
    let Ok(pattern) = OutputPattern::parse(pattern_text(form)) else {
        return UNKNOWN.into();
    };

    match media::pattern_preview(&pattern, estimate) {
        PatternPreview {
            first,
            last: Some(last),
        } => format!("{first} \u{2026} {last}"),
        PatternPreview { first, last: None } => first,
    }
}

/// Lower the fps field to the source's frame rate if it asks for more. A
/// status note is returned when the field was changed.
pub fn clamp_fps(form: &mut Preferences, source: &SourceInfo) -> Option<String> {
    let requested = optional(&form.fps).and_then(|f| FrameRate::parse(f).ok())?;
    let ceiling = media::fps_ceiling(source, requested)?;

    form.fps = format!("{:.3}", ceiling.get());
    Some(format!("FPS limited to source rate: {:.3}", ceiling.get()))
}

/// The format the pattern field currently writes, if it's valid.
pub fn preset(form: &Preferences) -> Option<ImageFormat> {
    OutputPattern::parse(pattern_text(form))
        .ok()
        .map(|p| p.format())
}

/// Switch the pattern field to `format`, keeping the rest of the pattern when
/// it's valid.
pub fn apply_preset(form: &mut Preferences, format: ImageFormat) {
    let default = OutputPattern::default();
    let pattern = OutputPattern::parse(pattern_text(form)).unwrap_or(default);
    form.pattern = pattern.with_format(format).to_string();
}

/// Reset every form field, keeping settings that aren't part of the form.
pub fn reset(form: &mut Preferences) {
    *form = Preferences {
        theme: form.theme,
        ..Default::default()
    };
}

/// Why the form can't be turned into [ExtractionOptions].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    #[error("Fix validation errors above.")]
    InvalidFields,
    #[error("Choose an input video.")]
    MissingInput,
    #[error("Choose an output directory.")]
    MissingOutput,
}

fn optional(text: &str) -> Option<&str> {
    Some(text.trim()).filter(|t| !t.is_empty())
}

fn pattern_text(form: &Preferences) -> &str {
    optional(&form.pattern).unwrap_or(DEFAULT_PATTERN)
}

#[cfg(test)]
mod tests {
    use media::Dimensions;

    use super::*;

    fn form() -> Preferences {
        Preferences {
            input_video: "clip.mp4".into(),
            output_dir: "frames".into(),
            ..Default::default()
        }
    }

    fn source() -> SourceInfo {
        SourceInfo {
            fps: Some(25.0),
            duration: Some(10.0),
            dimensions: Dimensions::new(640, 480),
        }
    }

    #[test]
    fn empty_optional_fields_are_valid() {
        let form = Preferences {
            pattern: " ".into(),
            ..form()
        };
        assert!(validate(&form).is_empty());
    }

    #[test]
    fn bad_fields_get_inline_errors() {
        let form = Preferences {
            start: "soon".into(),
            fps: "0".into(),
            pattern: "frame.txt".into(),
            ..form()
        };
        let errors = validate(&form);
        assert_eq!(errors.start.as_deref(), Some("Invalid time"));
        assert_eq!(errors.end, None);
        assert_eq!(errors.fps.as_deref(), Some("FPS > 0"));
        assert!(errors.pattern.unwrap().contains(".txt"));

        assert_eq!(to_options(&form, false), Err(FormError::InvalidFields));
    }

    #[test]
    fn options_from_the_form() {
        let form = Preferences {
            start: " 00:00:02 ".into(),
            fps: "2".into(),
            overwrite: true,
            ..form()
        };
        let options = to_options(&form, false).unwrap();
        assert_eq!(options.input(), PathBuf::from("clip.mp4"));
        assert_eq!(options.start().map(TimeSpec::as_str), Some("00:00:02"));
        assert_eq!(options.end(), None);
        assert_eq!(options.pattern().as_str(), DEFAULT_PATTERN);
        assert!(options.overwrite() && !options.dry_run());

        assert!(to_options(&form, true).unwrap().dry_run());
    }

    #[test]
    fn paths_are_required() {
        let no_input = Preferences {
            input_video: "".into(),
            ..form()
        };
        assert_eq!(to_options(&no_input, true), Err(FormError::MissingInput));

        let no_output = Preferences {
            output_dir: "  ".into(),
            ..form()
        };
        assert_eq!(to_options(&no_output, true), Err(FormError::MissingOutput));
    }

    #[test]
    fn estimates_and_previews() {
        let form = Preferences {
            start: "2".into(),
            end: "00:00:04.5".into(),
            fps: "4".into(),
            ..form()
        };
        let n = estimate(&form, &source());
        assert_eq!(n, Some(10));
        assert_eq!(estimate_text(n), "~10 frames");
        assert_eq!(
            preview_text(&form, n),
            "frame_000001.jpg \u{2026} frame_000010.jpg"
        );

        assert_eq!(estimate(&form, &SourceInfo::default()), Some(10));
        let no_fps = Preferences {
            fps: "".into(),
            ..form.clone()
        };
        assert_eq!(estimate(&no_fps, &source()), None);
        assert_eq!(estimate_text(None), UNKNOWN);
        assert_eq!(preview_text(&form, None), "frame_000001.jpg");

        let bad = Preferences {
            pattern: "nope".into(),
            ..form
        };
        assert_eq!(preview_text(&bad, Some(3)), UNKNOWN);
    }

    #[test]
    fn fps_is_clamped_to_the_source() {
        let mut form = Preferences {
            fps: "60".into(),
            ..form()
        };
        let note = clamp_fps(&mut form, &source());
        assert_eq!(form.fps, "25.000");
        assert_eq!(note.as_deref(), Some("FPS limited to source rate: 25.000"));

        // Already within the limit.
        assert_eq!(clamp_fps(&mut form, &source()), None);
        assert_eq!(form.fps, "25.000");
    }

    #[test]
    fn presets_swap_the_extension() {
        let mut form = Preferences {
            pattern: "shot_%04d.jpeg".into(),
            ..form()
        };
        assert_eq!(preset(&form), Some(ImageFormat::Jpeg));

        apply_preset(&mut form, ImageFormat::Png);
        assert_eq!(form.pattern, "shot_%04d.png");
        assert_eq!(preset(&form), Some(ImageFormat::Png));

        form.pattern = "broken".into();
        apply_preset(&mut form, ImageFormat::Png);
        assert_eq!(form.pattern, "frame_%06d.png");
    }

    #[test]
    fn reset_keeps_the_theme() {
        let mut form = Preferences {
            theme: crate::prefs::Theme::Dark,
            verbose: true,
            ..form()
        };
        reset(&mut form);
        assert_eq!(form.theme, crate::prefs::Theme::Dark);
        assert_eq!(form.input_video, "");
        assert!(!form.verbose);
    }
}
