/// Log format catalog and per-buffer format detection.
///
/// - `matcher.rs`: one configured format (compiled patterns)
/// - `catalog.rs`: ordered set of enabled matchers
/// - `detect.rs`: sampling detector with per-buffer caching
///
/// Detection never fails: malformed patterns are dropped at catalog
/// construction and an unrecognized buffer degrades to "no format
/// determined" instead of an error.
pub mod catalog;
pub mod detect;
pub mod matcher;

pub use catalog::FormatCatalog;
pub use detect::{DetectedFormat, FormatDetector};
pub use matcher::{LineMatcher, PatternError};

// Constants
pub const DETECTION_SAMPLE_LINES: usize = 10_000;
pub const MIN_FORMAT_MATCHES: usize = 1;
