use std::collections::HashMap;

use crate::buffer::{BufferContext, TextBuffer};
use crate::format::{FormatDetector, LineMatcher};

/// Inclusive line range of one logical event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRange {
    pub start: usize,
    pub end: usize,
}

impl EventRange {
    pub fn singleton(line: usize) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    pub fn contains(&self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }
}

/// Sparse memoization of resolved boundaries: line → event start line and
/// line → event end line.
///
/// Grow-only; entries are never removed individually. Whenever an end is
/// discovered or adopted, every line visited on the way is back-filled with
/// the same value (symmetric for starts), so repeated queries over a
/// contiguous region amortize to near-constant cost.
#[derive(Debug, Default)]
pub struct BoundaryCache {
    starts: HashMap<usize, usize>,
    ends: HashMap<usize, usize>,
}

impl BoundaryCache {
    pub(crate) fn start(&self, line: usize) -> Option<usize> {
        self.starts.get(&line).copied()
    }

    pub(crate) fn end(&self, line: usize) -> Option<usize> {
        self.ends.get(&line).copied()
    }

    pub(crate) fn set_start(&mut self, line: usize, start: usize) {
        self.starts.insert(line, start);
    }

    pub(crate) fn set_end(&mut self, line: usize, end: usize) {
        self.ends.insert(line, end);
    }

    pub(crate) fn clear(&mut self) {
        self.starts.clear();
        self.ends.clear();
    }
}

/// Answers "what is the inclusive line range of the event containing line L"
/// using the buffer's detected format, with bidirectional memoization in the
/// buffer context.
pub struct EventBoundaryResolver {
    detector: FormatDetector,
}

impl EventBoundaryResolver {
    pub fn new(detector: FormatDetector) -> Self {
        Self { detector }
    }

    pub fn detector(&self) -> &FormatDetector {
        &self.detector
    }

    /// Resolve the event range containing `at_line`.
    ///
    /// Returns `None` for a line outside the buffer. Without a detected
    /// format no multi-line merging is attempted: every line is its own
    /// singleton event, which also keeps every scan bounded.
    pub fn event_range(
        &self,
        buffer: &dyn TextBuffer,
        ctx: &BufferContext,
        at_line: usize,
    ) -> Option<EventRange> {
        let line_count = buffer.line_count();
        if at_line >= line_count {
            return None;
        }

        let format = self.detector.detect(buffer, ctx);
        let matcher = match format.matcher() {
            Some(matcher) => matcher,
            None => return Some(EventRange::singleton(at_line)),
        };

        let end = resolve_end(buffer, ctx, matcher, at_line, line_count);
        let start = resolve_start(buffer, ctx, matcher, at_line);
        Some(EventRange { start, end })
    }
}

/// Forward scan: walk while the *next* line is not a recognized event start,
/// adopting any cached end value encountered, then back-propagate the
/// discovered end to every visited line.
fn resolve_end(
    buffer: &dyn TextBuffer,
    ctx: &BufferContext,
    matcher: &LineMatcher,
    at_line: usize,
    line_count: usize,
) -> usize {
    ctx.with_bounds(|cache| {
        if let Some(end) = cache.end(at_line) {
            return end;
        }
        let mut visited = Vec::new();
        let mut line = at_line;
        let end = loop {
            visited.push(line);
            if line + 1 >= line_count {
                break line;
            }
            if matcher.is_line_start(buffer.line_text(line + 1)) {
                break line;
            }
            line += 1;
            if let Some(end) = cache.end(line) {
                break end;
            }
        };
        for v in visited {
            cache.set_end(v, end);
        }
        end
    })
}

/// Backward scan: walk while the current line is not itself a recognized
/// event start, symmetric to [`resolve_end`].
fn resolve_start(
    buffer: &dyn TextBuffer,
    ctx: &BufferContext,
    matcher: &LineMatcher,
    at_line: usize,
) -> usize {
    ctx.with_bounds(|cache| {
        if let Some(start) = cache.start(at_line) {
            return start;
        }
        let mut visited = Vec::new();
        let mut line = at_line;
        let start = loop {
            visited.push(line);
            if matcher.is_line_start(buffer.line_text(line)) {
                break line;
            }
            if line == 0 {
                break 0;
            }
            line -= 1;
            if let Some(start) = cache.start(line) {
                break start;
            }
        };
        for v in visited {
            cache.set_start(v, start);
        }
        start
    })
}
