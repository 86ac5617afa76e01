use std::sync::Arc;
use tracing::warn;

use crate::conf::MatcherConfig;

use super::matcher::LineMatcher;

/// Ordered set of enabled line matchers, independent of any buffer.
///
/// Registration order is the tie-break order during detection: the first
/// matcher reaching the maximum match count wins. Entries with malformed
/// pattern text are dropped here with a logged diagnostic and never reach
/// detection.
#[derive(Debug, Default)]
pub struct FormatCatalog {
    matchers: Vec<Arc<LineMatcher>>,
}

impl FormatCatalog {
    pub fn from_config(formats: &[MatcherConfig]) -> Self {
        let mut matchers = Vec::with_capacity(formats.len());
        for format in formats {
            if !format.enabled {
                continue;
            }
            match LineMatcher::new(
                &format.name,
                &format.pattern,
                &format.line_start_pattern,
                &format.time_pattern,
            ) {
                Ok(matcher) => matchers.push(Arc::new(matcher)),
                Err(e) => {
                    warn!(format = %format.name, error = %e, "dropping format with malformed pattern");
                }
            }
        }
        Self { matchers }
    }

    pub fn matchers(&self) -> &[Arc<LineMatcher>] {
        &self.matchers
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(name: &str, line_start: &str) -> MatcherConfig {
        MatcherConfig {
            name: name.to_string(),
            pattern: ".*".to_string(),
            line_start_pattern: line_start.to_string(),
            time_pattern: r"\d+".to_string(),
            enabled: true,
        }
    }

    #[test]
    fn test_catalog_preserves_registration_order() {
        let catalog = FormatCatalog::from_config(&[format("a", "^A"), format("b", "^B")]);
        let names: Vec<&str> = catalog.matchers().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_catalog_drops_malformed_patterns() {
        let mut broken = format("broken", "^B");
        broken.pattern = "[unclosed".to_string();

        let catalog = FormatCatalog::from_config(&[format("a", "^A"), broken, format("c", "^C")]);
        let names: Vec<&str> = catalog.matchers().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_catalog_skips_disabled_formats() {
        let mut off = format("off", "^O");
        off.enabled = false;

        let catalog = FormatCatalog::from_config(&[off, format("on", "^X")]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.matchers()[0].name(), "on");
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = FormatCatalog::from_config(&[]);
        assert!(catalog.is_empty());
    }
}
