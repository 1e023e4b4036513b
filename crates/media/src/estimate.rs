//! Predictions shown before an extraction runs: how many frames to expect,
//! the highest useful frame rate, and which file names will be written.

use crate::frame_rate::FrameRate;
use crate::pattern::OutputPattern;
use crate::source::SourceInfo;

/// Roughly how many frames sampling at `fps` will produce.
///
/// The range is `end - start` when both are given and `end` comes after
/// `start`, otherwise the source's whole duration. [None] is returned when
/// there's no usable range or no frame rate.
pub fn estimate_frames(
    source: &SourceInfo,
    start: Option<f64>,
    end: Option<f64>,
    fps: Option<FrameRate>,
) -> Option<u64> {
    let range = match (start, end) {
        (Some(start), Some(end)) if end > start => end - start,
        _ => source.duration?,
    };
    let fps = fps?;

    (range > 0.0).then(|| (range * fps.get()).floor() as u64)
}

/// The source's frame rate if `requested` is faster than it (sampling faster
/// than the source only duplicates frames). [None] means `requested` is fine.
pub fn fps_ceiling(source: &SourceInfo, requested: FrameRate) -> Option<FrameRate> {
    let source_fps = FrameRate::new(source.fps?).ok()?;
    (requested > source_fps).then_some(source_fps)
}

/// The first and (when the count is known) last file names an extraction
/// will write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternPreview {
    pub first: String,
    pub last: Option<String>,
}

pub fn pattern_preview(pattern: &OutputPattern, estimate: Option<u64>) -> PatternPreview {
    PatternPreview {
        first: pattern.file_name(1),
        last: estimate.filter(|n| *n > 0).map(|n| pattern.file_name(n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(fps: Option<f64>, duration: Option<f64>) -> SourceInfo {
        SourceInfo {
            fps,
            duration,
            dimensions: None,
        }
    }

    fn fps(value: f64) -> Option<FrameRate> {
        FrameRate::new(value).ok()
    }

    #[test]
    fn estimate_uses_the_trimmed_range() {
        let src = source(Some(30.0), Some(60.0));
        assert_eq!(estimate_frames(&src, Some(5.0), Some(10.0), fps(2.0)), Some(10));
        assert_eq!(estimate_frames(&src, Some(0.0), Some(1.5), fps(3.0)), Some(4));
    }

    #[test]
    fn estimate_falls_back_to_the_duration() {
        let src = source(None, Some(10.5));
        assert_eq!(estimate_frames(&src, None, None, fps(1.0)), Some(10));
        assert_eq!(estimate_frames(&src, Some(4.0), None, fps(2.0)), Some(21));
        // End before start isn't a range.
        assert_eq!(estimate_frames(&src, Some(8.0), Some(2.0), fps(1.0)), Some(10));
    }

    #[test]
    fn estimate_needs_a_range_and_a_rate() {
        assert_eq!(estimate_frames(&source(None, None), None, None, fps(1.0)), None);
        assert_eq!(estimate_frames(&source(None, Some(5.0)), None, None, None), None);
        assert_eq!(estimate_frames(&source(None, Some(0.0)), None, None, fps(1.0)), None);
    }

    #[test]
    fn ceiling_only_when_too_fast() {
        let src = source(Some(25.0), None);
        assert_eq!(fps_ceiling(&src, FrameRate::new(60.0).unwrap()), fps(25.0));
        assert_eq!(fps_ceiling(&src, FrameRate::new(25.0).unwrap()), None);
        assert_eq!(fps_ceiling(&src, FrameRate::new(2.0).unwrap()), None);
        assert_eq!(
            fps_ceiling(&source(None, None), FrameRate::new(60.0).unwrap()),
            None
        );
    }

    #[test]
    fn previews() {
        let pattern = OutputPattern::parse("frame_%06d.jpg").unwrap();
        assert_eq!(
            pattern_preview(&pattern, Some(120)),
            PatternPreview {
                first: "frame_000001.jpg".into(),
                last: Some("frame_000120.jpg".into()),
            }
        );
        assert_eq!(pattern_preview(&pattern, Some(0)).last, None);
        assert_eq!(pattern_preview(&pattern, None).last, None);
    }
}
