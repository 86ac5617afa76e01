use std::sync::Arc;

use crate::render::{HighlightLayer, LinkTarget, RenderSurface, TextAttributes};

use super::traits::FilterResult;

/// A computed annotation addressed by absolute buffer offsets.
///
/// Absolute addressing keeps an annotation valid even when scheduling
/// delays its application, regardless of what the surface renders in the
/// meantime.
pub enum Annotation {
    Highlight {
        start: usize,
        end: usize,
        attributes: Option<TextAttributes>,
        layer: HighlightLayer,
    },
    Hyperlink {
        start: usize,
        end: usize,
        attributes: Option<TextAttributes>,
        target: Arc<dyn LinkTarget>,
    },
}

impl Annotation {
    /// Rebase a pass-relative filter result onto absolute buffer offsets.
    pub fn from_result(result: FilterResult, base_offset: usize) -> Self {
        let start = base_offset + result.start;
        let end = base_offset + result.end;
        match result.target {
            Some(target) => Annotation::Hyperlink {
                start,
                end,
                attributes: result.attributes,
                target,
            },
            None => Annotation::Highlight {
                start,
                end,
                attributes: result.attributes,
                layer: result.layer,
            },
        }
    }

    pub fn range(&self) -> (usize, usize) {
        match self {
            Annotation::Highlight { start, end, .. } => (*start, *end),
            Annotation::Hyperlink { start, end, .. } => (*start, *end),
        }
    }

    /// Hand the annotation to the surface. Must only be called from inside
    /// the surface's serialized update mechanism.
    pub fn apply(self, surface: &dyn RenderSurface) {
        match self {
            Annotation::Highlight {
                start,
                end,
                attributes,
                layer,
            } => surface.add_highlight(start, end, attributes, layer),
            Annotation::Hyperlink {
                start,
                end,
                attributes,
                target,
            } => surface.add_hyperlink(start, end, attributes, target),
        }
    }
}
