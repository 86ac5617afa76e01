//! Model — EngineConfig and related structs.

use serde::{Deserialize, Serialize};

use crate::format::{DETECTION_SAMPLE_LINES, MIN_FORMAT_MATCHES};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ordered format definitions; the order is the detection tie-break
    /// order.
    pub formats: Vec<MatcherConfig>,
    pub detection: DetectionConfig,
    /// Global kill-switch for the deferred heavy filter tier.
    pub heavy_pass_enabled: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// How many leading buffer lines detection samples.
    pub sample_lines: usize,
    /// Minimum line-start matches a format needs to be selected.
    pub min_matches: usize,
}

/// One user-configured log format. Pattern text is plain regex source;
/// malformed text is rejected at catalog construction with a logged
/// diagnostic, never as a load error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    pub name: String,
    /// Full event pattern, matched with dot-matches-newline semantics.
    pub pattern: String,
    /// Pattern recognizing a line that starts a new event.
    pub line_start_pattern: String,
    /// Timestamp-extraction pattern.
    pub time_pattern: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            formats: default_formats(),
            detection: DetectionConfig::default(),
            heavy_pass_enabled: true,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            sample_lines: DETECTION_SAMPLE_LINES,
            min_matches: MIN_FORMAT_MATCHES,
        }
    }
}

/// Built-in format set used when no config file provides formats.
pub fn default_formats() -> Vec<MatcherConfig> {
    vec![
        MatcherConfig {
            name: "iso-timestamp".to_string(),
            pattern: r"^\d{4}-\d{2}-\d{2}[ T]\d{2}:\d{2}:\d{2}.*".to_string(),
            line_start_pattern: r"^\d{4}-\d{2}-\d{2}[ T]\d{2}:\d{2}:\d{2}".to_string(),
            time_pattern: r"\d{4}-\d{2}-\d{2}[ T]\d{2}:\d{2}:\d{2}(?:[.,]\d{1,9})?".to_string(),
            enabled: true,
        },
        MatcherConfig {
            name: "syslog".to_string(),
            pattern: r"^(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec) {1,2}\d{1,2} \d{2}:\d{2}:\d{2}.*".to_string(),
            line_start_pattern: r"^(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec) {1,2}\d{1,2} \d{2}:\d{2}:\d{2}".to_string(),
            time_pattern: r"\d{2}:\d{2}:\d{2}".to_string(),
            enabled: true,
        },
        MatcherConfig {
            name: "logcat".to_string(),
            pattern: r"^\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3}.*".to_string(),
            line_start_pattern: r"^\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3}".to_string(),
            time_pattern: r"\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3}".to_string(),
            enabled: true,
        },
    ]
}

impl EngineConfig {
    /// Validate configuration values are sane.
    pub fn validate(&self) -> Result<(), String> {
        if self.detection.sample_lines == 0 {
            return Err("detection.sample_lines must be > 0".to_string());
        }
        if self.detection.min_matches == 0 {
            return Err("detection.min_matches must be > 0".to_string());
        }
        for format in &self.formats {
            if format.name.is_empty() {
                return Err("format name must not be empty".to_string());
            }
            if format.line_start_pattern.is_empty() {
                return Err(format!(
                    "format '{}' has an empty line_start_pattern",
                    format.name
                ));
            }
        }
        Ok(())
    }
}
