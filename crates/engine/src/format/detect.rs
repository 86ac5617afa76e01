use std::sync::Arc;
use tracing::debug;

use crate::buffer::{BufferContext, TextBuffer};
use crate::conf::DetectionConfig;

use super::catalog::FormatCatalog;
use super::matcher::LineMatcher;

/// Outcome of format detection for one buffer.
#[derive(Debug, Clone)]
pub enum DetectedFormat {
    /// No matcher reached the match threshold, or the catalog is empty.
    Undetermined,
    /// Exactly one matcher chosen for the buffer.
    Format(Arc<LineMatcher>),
}

impl DetectedFormat {
    pub fn matcher(&self) -> Option<&Arc<LineMatcher>> {
        match self {
            DetectedFormat::Undetermined => None,
            DetectedFormat::Format(matcher) => Some(matcher),
        }
    }

    pub fn is_determined(&self) -> bool {
        matches!(self, DetectedFormat::Format(_))
    }
}

/// Samples early buffer lines and picks the best-matching catalog format.
///
/// The result is cached in the buffer's context until
/// [`BufferContext::clear`]; re-detection is never triggered internally.
pub struct FormatDetector {
    catalog: Arc<FormatCatalog>,
    sample_lines: usize,
    min_matches: usize,
}

impl FormatDetector {
    pub fn new(catalog: Arc<FormatCatalog>, detection: &DetectionConfig) -> Self {
        Self {
            catalog,
            sample_lines: detection.sample_lines,
            min_matches: detection.min_matches,
        }
    }

    pub fn catalog(&self) -> &Arc<FormatCatalog> {
        &self.catalog
    }

    /// Idempotent and cached per buffer. Never fails — an unrecognized
    /// buffer degrades to [`DetectedFormat::Undetermined`].
    pub fn detect(&self, buffer: &dyn TextBuffer, ctx: &BufferContext) -> DetectedFormat {
        if let Some(cached) = ctx.cached_format() {
            return cached;
        }
        let result = self.sample(buffer);
        ctx.store_format(result.clone());
        result
    }

    /// Count line-start matches per matcher over the first `sample_lines`
    /// lines (fewer if the buffer is shorter), then select the strictly
    /// highest count at or above the threshold. The first maximum
    /// encountered wins ties, preserving registration order.
    fn sample(&self, buffer: &dyn TextBuffer) -> DetectedFormat {
        let matchers = self.catalog.matchers();
        if matchers.is_empty() {
            return DetectedFormat::Undetermined;
        }

        let sampled = buffer.line_count().min(self.sample_lines);
        let mut counts = vec![0usize; matchers.len()];
        for line in 0..sampled {
            let text = buffer.line_text(line);
            for (i, matcher) in matchers.iter().enumerate() {
                if matcher.is_line_start(text) {
                    counts[i] += 1;
                }
            }
        }

        let mut best: Option<(usize, usize)> = None;
        for (i, &count) in counts.iter().enumerate() {
            if count >= self.min_matches && best.map_or(true, |(_, c)| count > c) {
                best = Some((i, count));
            }
        }

        match best {
            Some((i, count)) => {
                debug!(
                    format = matchers[i].name(),
                    matches = count,
                    sampled,
                    "log format detected"
                );
                DetectedFormat::Format(Arc::clone(&matchers[i]))
            }
            None => {
                debug!(sampled, "no log format determined");
                DetectedFormat::Undetermined
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::LineIndexedText;
    use crate::conf::MatcherConfig;

    fn format(name: &str, line_start: &str) -> MatcherConfig {
        MatcherConfig {
            name: name.to_string(),
            pattern: ".*".to_string(),
            line_start_pattern: line_start.to_string(),
            time_pattern: r"\d+".to_string(),
            enabled: true,
        }
    }

    fn detector(formats: &[MatcherConfig]) -> FormatDetector {
        let catalog = Arc::new(FormatCatalog::from_config(formats));
        FormatDetector::new(catalog, &DetectionConfig::default())
    }

    #[test]
    fn test_highest_match_count_wins() {
        // A matches 5 sampled lines, B matches 3.
        let detector = detector(&[format("a", "^A"), format("b", "^B")]);
        let buffer = LineIndexedText::new("A\nA\nB\nA\nB\nA\nB\nA\nx\ny\n".to_string());
        let ctx = BufferContext::new();

        let detected = detector.detect(&buffer, &ctx);
        assert_eq!(detected.matcher().map(|m| m.name()), Some("a"));
    }

    #[test]
    fn test_zero_matches_never_selected() {
        let detector = detector(&[format("a", "^A")]);
        let buffer = LineIndexedText::new("x\ny\nz\n".to_string());
        let ctx = BufferContext::new();

        assert!(!detector.detect(&buffer, &ctx).is_determined());
    }

    #[test]
    fn test_tie_breaks_by_registration_order() {
        let detector = detector(&[format("first", "^AB"), format("second", "^A")]);
        let buffer = LineIndexedText::new("ABx\nABy\n".to_string());
        let ctx = BufferContext::new();

        let detected = detector.detect(&buffer, &ctx);
        assert_eq!(detected.matcher().map(|m| m.name()), Some("first"));
    }

    #[test]
    fn test_empty_catalog_is_undetermined() {
        let detector = detector(&[]);
        let buffer = LineIndexedText::new("A\n".to_string());
        let ctx = BufferContext::new();

        assert!(!detector.detect(&buffer, &ctx).is_determined());
    }

    #[test]
    fn test_empty_buffer_is_undetermined() {
        let detector = detector(&[format("a", "^A")]);
        let buffer = LineIndexedText::new(String::new());
        let ctx = BufferContext::new();

        assert!(!detector.detect(&buffer, &ctx).is_determined());
    }

    #[test]
    fn test_detection_is_deterministic() {
        let detector = detector(&[format("a", "^A"), format("b", "^B")]);
        let buffer = LineIndexedText::new("A\nB\nA\n".to_string());

        for _ in 0..3 {
            let ctx = BufferContext::new();
            let detected = detector.detect(&buffer, &ctx);
            assert_eq!(detected.matcher().map(|m| m.name()), Some("a"));
        }
    }

    #[test]
    fn test_result_cached_until_clear() {
        let detector = detector(&[format("a", "^A"), format("b", "^B")]);
        let ctx = BufferContext::new();

        let buffer = LineIndexedText::new("A\nA\n".to_string());
        assert_eq!(
            detector.detect(&buffer, &ctx).matcher().map(|m| m.name()),
            Some("a")
        );

        // Content replaced but no clear(): cached result is reused as-is.
        let reloaded = LineIndexedText::new("B\nB\n".to_string());
        assert_eq!(
            detector.detect(&reloaded, &ctx).matcher().map(|m| m.name()),
            Some("a")
        );

        // Explicit clear() triggers re-detection.
        ctx.clear();
        assert_eq!(
            detector.detect(&reloaded, &ctx).matcher().map(|m| m.name()),
            Some("b")
        );
    }

    #[test]
    fn test_sampling_respects_limit() {
        let catalog = Arc::new(FormatCatalog::from_config(&[format("a", "^A")]));
        let detection = DetectionConfig {
            sample_lines: 2,
            min_matches: 1,
        };
        let detector = FormatDetector::new(catalog, &detection);

        // Matches appear only past the sampling window.
        let buffer = LineIndexedText::new("x\ny\nA\nA\n".to_string());
        let ctx = BufferContext::new();
        assert!(!detector.detect(&buffer, &ctx).is_determined());
    }
}
