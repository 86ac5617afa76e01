use std::sync::Arc;
use thiserror::Error;

use crate::buffer::TextBuffer;
use crate::render::{HighlightLayer, LinkTarget, TextAttributes};

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("filter execution failed: {0}")]
    Execution(String),
}

/// One annotation produced by a filter, with offsets relative to the pass
/// it came from: line-relative for the cheap pass, chunk-relative for the
/// heavy pass. The scheduler rebases to absolute buffer offsets.
#[derive(Clone)]
pub struct FilterResult {
    pub start: usize,
    pub end: usize,
    pub attributes: Option<TextAttributes>,
    pub target: Option<Arc<dyn LinkTarget>>,
    pub layer: HighlightLayer,
}

impl FilterResult {
    pub fn highlight(
        start: usize,
        end: usize,
        attributes: Option<TextAttributes>,
        layer: HighlightLayer,
    ) -> Self {
        Self {
            start,
            end,
            attributes,
            target: None,
            layer,
        }
    }

    pub fn hyperlink(
        start: usize,
        end: usize,
        attributes: Option<TextAttributes>,
        target: Arc<dyn LinkTarget>,
    ) -> Self {
        Self {
            start,
            end,
            attributes,
            target: Some(target),
            layer: HighlightLayer::HYPERLINK,
        }
    }
}

/// Filter plugin capability.
///
/// Implementations are opaque to the engine: it only orchestrates calling
/// them. A returned error skips that filter's contribution for that unit of
/// work and never aborts sibling lines, filters, or chunks.
pub trait AnnotationFilter: Send + Sync {
    /// Name used in diagnostics when the filter fails.
    fn name(&self) -> &str;

    /// Cheap single-line pass, run synchronously on the submitting context.
    fn apply_line(&self, line: &str) -> Result<Vec<FilterResult>, FilterError>;

    /// Does this filter have expensive multi-line work at all? Checked once
    /// per heavy task before any heavy work is done.
    fn should_run_heavy(&self) -> bool {
        false
    }

    /// Expensive pass over one line index of a chunk copy, with the whole
    /// chunk available for multi-line context.
    fn apply_heavy(
        &self,
        _chunk: &dyn TextBuffer,
        _line: usize,
    ) -> Result<Option<FilterResult>, FilterError> {
        Ok(None)
    }
}
