use chrono::NaiveDateTime;
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("invalid {field} pattern for format '{name}': {message}")]
    InvalidRegex {
        name: String,
        field: &'static str,
        message: String,
    },
}

/// One configured log format.
///
/// Holds the pattern recognizing a line that starts a new event, the full
/// event pattern (matched with dot-matches-newline semantics so it can span
/// continuation lines), and the timestamp-extraction pattern. Immutable once
/// constructed; construction fails on malformed pattern text and the catalog
/// drops such entries instead of surfacing them to detection callers.
#[derive(Debug)]
pub struct LineMatcher {
    name: String,
    event: Regex,
    line_start: Regex,
    time: Regex,
}

/// Timestamp layouts tried against extracted stamp text. Comma fractional
/// separators are normalized to dots first.
const TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.fZ",
];

impl LineMatcher {
    pub fn new(
        name: &str,
        pattern: &str,
        line_start_pattern: &str,
        time_pattern: &str,
    ) -> Result<Self, PatternError> {
        Ok(Self {
            name: name.to_string(),
            event: compile(name, "event", &format!("(?s){pattern}"))?,
            line_start: compile(name, "line_start", line_start_pattern)?,
            time: compile(name, "time", time_pattern)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Does this physical line begin a new event?
    pub fn is_line_start(&self, line: &str) -> bool {
        self.line_start.is_match(line)
    }

    /// Does the (possibly multi-line) text match the full event pattern?
    pub fn matches_event(&self, text: &str) -> bool {
        self.event.is_match(text)
    }

    /// The raw timestamp text within a line, if present.
    pub fn extract_timestamp<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.time.find(line).map(|m| m.as_str())
    }

    /// Extracted timestamp parsed into a date-time, if it fits a known layout.
    pub fn parse_timestamp(&self, line: &str) -> Option<NaiveDateTime> {
        let raw = self.extract_timestamp(line)?;
        let normalized = raw.replace(',', ".");
        TIME_FORMATS
            .iter()
            .find_map(|layout| NaiveDateTime::parse_from_str(&normalized, layout).ok())
    }
}

fn compile(name: &str, field: &'static str, pattern: &str) -> Result<Regex, PatternError> {
    Regex::new(pattern).map_err(|e| PatternError::InvalidRegex {
        name: name.to_string(),
        field,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iso_matcher() -> LineMatcher {
        LineMatcher::new(
            "iso",
            r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}.*",
            r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}",
            r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}(?:[.,]\d{1,9})?",
        )
        .expect("valid patterns")
    }

    #[test]
    fn test_line_start_recognition() {
        let matcher = iso_matcher();
        assert!(matcher.is_line_start("2024-01-01 10:00:00 ERROR boom"));
        assert!(!matcher.is_line_start("  at foo()"));
        assert!(!matcher.is_line_start(""));
    }

    #[test]
    fn test_event_pattern_spans_newlines() {
        let matcher = iso_matcher();
        let event = "2024-01-01 10:00:00 ERROR boom\n  at foo()\n  at bar()";
        assert!(matcher.matches_event(event));
    }

    #[test]
    fn test_timestamp_extraction() {
        let matcher = iso_matcher();
        assert_eq!(
            matcher.extract_timestamp("2024-01-01 10:00:00,123 ERROR boom"),
            Some("2024-01-01 10:00:00,123")
        );
        assert_eq!(matcher.extract_timestamp("no stamp here"), None);
    }

    #[test]
    fn test_timestamp_parsing_with_comma_millis() {
        let matcher = iso_matcher();
        let parsed = matcher
            .parse_timestamp("2024-01-01 10:00:00,123 ERROR boom")
            .expect("parses");
        assert_eq!(parsed.format("%H:%M:%S%.3f").to_string(), "10:00:00.123");
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let result = LineMatcher::new("broken", "[unclosed", r"^\d", r"\d+");
        assert!(result.is_err());
        let err = result.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("broken"));
        assert!(err.contains("event"));
    }

    #[test]
    fn test_invalid_line_start_pattern_is_an_error() {
        let result = LineMatcher::new("broken", ".*", "(", r"\d+");
        assert!(result.is_err());
    }
}
