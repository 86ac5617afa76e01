//! Text buffer collaborator — line-indexed access over append-only log text.

pub mod context;

pub use context::BufferContext;

/// Line-indexed view over a text buffer.
///
/// The host editor supplies the real implementation; [`LineIndexedText`] is
/// the owned implementation used for ephemeral chunk copies handed to heavy
/// filters. Line/offset lookups must be O(1) or O(log n) — boundary
/// resolution and format detection lean on that.
pub trait TextBuffer {
    /// Number of logical lines. A trailing newline does not open a new line.
    fn line_count(&self) -> usize;

    /// Byte offset of the first character of `line`.
    fn line_start(&self, line: usize) -> usize;

    /// Byte offset one past the last character of `line`, excluding the
    /// line terminator.
    fn line_end(&self, line: usize) -> usize;

    /// The full character sequence.
    fn text(&self) -> &str;

    /// Text of `line` without its terminator.
    fn line_text(&self, line: usize) -> &str {
        &self.text()[self.line_start(line)..self.line_end(line)]
    }
}

/// Owned text with a precomputed line-start index.
#[derive(Debug, Clone)]
pub struct LineIndexedText {
    text: String,
    line_starts: Vec<usize>,
}

impl LineIndexedText {
    pub fn new(text: String) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        // A start at the very end means the text ends with a newline (or is
        // empty) and opens no further line.
        if line_starts.last() == Some(&text.len()) {
            line_starts.pop();
        }
        Self { text, line_starts }
    }
}

impl TextBuffer for LineIndexedText {
    fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn line_start(&self, line: usize) -> usize {
        self.line_starts[line]
    }

    fn line_end(&self, line: usize) -> usize {
        match self.line_starts.get(line + 1) {
            Some(&next) => next - 1,
            None => {
                if self.text.ends_with('\n') {
                    self.text.len() - 1
                } else {
                    self.text.len()
                }
            }
        }
    }

    fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_no_lines() {
        let buffer = LineIndexedText::new(String::new());
        assert_eq!(buffer.line_count(), 0);
    }

    #[test]
    fn test_single_line_without_newline() {
        let buffer = LineIndexedText::new("hello".to_string());
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line_start(0), 0);
        assert_eq!(buffer.line_end(0), 5);
        assert_eq!(buffer.line_text(0), "hello");
    }

    #[test]
    fn test_trailing_newline_opens_no_line() {
        let buffer = LineIndexedText::new("a\nbb\n".to_string());
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line_text(0), "a");
        assert_eq!(buffer.line_text(1), "bb");
        assert_eq!(buffer.line_end(1), 4);
    }

    #[test]
    fn test_line_offsets() {
        let buffer = LineIndexedText::new("ab\ncd\nef".to_string());
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.line_start(1), 3);
        assert_eq!(buffer.line_end(1), 5);
        assert_eq!(buffer.line_start(2), 6);
        assert_eq!(buffer.line_end(2), 8);
    }

    #[test]
    fn test_blank_lines_preserved() {
        let buffer = LineIndexedText::new("\n\nx".to_string());
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.line_text(0), "");
        assert_eq!(buffer.line_text(1), "");
        assert_eq!(buffer.line_text(2), "x");
    }
}
