//! In-memory pad buffer.
//!
//! [`PadBuffer`] is a ropey-backed implementation of
//! [`HostEditor`](crate::HostEditor), used for tests and for embedding the
//! kernel without an external editor. Rope storage keeps line access and
//! range edits O(log N) on large pads.

use crate::error::AssistError;
use crate::patch::HostEditor;
use crate::position::Position;
use ropey::Rope;

/// A line-oriented text buffer with a single selection.
pub struct PadBuffer {
    rope: Rope,
    selection: (Position, Position),
}

impl PadBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            selection: (Position::new(0, 0), Position::new(0, 0)),
        }
    }

    /// Build a buffer from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: (Position::new(0, 0), Position::new(0, 0)),
        }
    }

    /// Get the complete text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Get total line count.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the text of the specified line, excluding its newline.
    pub fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        Some(text)
    }

    /// Character length of the specified line, excluding its newline.
    fn line_len(&self, line: usize) -> Option<usize> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let start = self.rope.line_to_char(line);
        let end = if line + 1 < self.rope.len_lines() {
            self.rope.line_to_char(line + 1) - 1
        } else {
            self.rope.len_chars()
        };
        Some(end - start)
    }

    /// Absolute character offset for a position, validating it exists.
    fn char_of(&self, position: Position) -> Result<usize, AssistError> {
        let line_len = self
            .line_len(position.line)
            .ok_or(AssistError::StalePosition)?;
        if position.column > line_len {
            return Err(AssistError::StalePosition);
        }
        Ok(self.rope.line_to_char(position.line) + position.column)
    }
}

impl Default for PadBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl HostEditor for PadBuffer {
    fn document_text(&self) -> String {
        self.rope.to_string()
    }

    fn selection(&self) -> (Position, Position) {
        self.selection
    }

    fn set_selection(&mut self, start: Position, end: Position) -> Result<(), AssistError> {
        self.char_of(start)?;
        self.char_of(end)?;
        self.selection = (start, end);
        Ok(())
    }

    fn replace_range(
        &mut self,
        start: Position,
        end: Position,
        text: &str,
    ) -> Result<(), AssistError> {
        let start_char = self.char_of(start)?;
        let end_char = self.char_of(end)?;
        if start_char > end_char {
            return Err(AssistError::StalePosition);
        }
        self.rope.remove(start_char..end_char);
        self.rope.insert(start_char, text);
        Ok(())
    }

    fn focus(&mut self) {
        // The in-process buffer always has focus.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buffer = PadBuffer::new();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line_text(0), Some(String::new()));
    }

    #[test]
    fn test_line_text_strips_newline() {
        let buffer = PadBuffer::from_text("Line 1\nLine 2\nLine 3");
        assert_eq!(buffer.line_text(0), Some("Line 1".to_string()));
        assert_eq!(buffer.line_text(2), Some("Line 3".to_string()));
        assert_eq!(buffer.line_text(3), None);
    }

    #[test]
    fn test_replace_range_within_line() {
        let mut buffer = PadBuffer::from_text("Hello Beautiful World");
        buffer
            .replace_range(Position::new(0, 6), Position::new(0, 15), "Cruel")
            .unwrap();
        assert_eq!(buffer.text(), "Hello Cruel World");
    }

    #[test]
    fn test_replace_range_across_lines() {
        let mut buffer = PadBuffer::from_text("one\ntwo\nthree");
        buffer
            .replace_range(Position::new(0, 1), Position::new(2, 2), "x")
            .unwrap();
        assert_eq!(buffer.text(), "oxree");
    }

    #[test]
    fn test_replace_range_rejects_out_of_bounds() {
        let mut buffer = PadBuffer::from_text("abc");
        let result = buffer.replace_range(Position::new(0, 0), Position::new(0, 4), "x");
        assert_eq!(result, Err(AssistError::StalePosition));
        let result = buffer.replace_range(Position::new(1, 0), Position::new(1, 0), "x");
        assert_eq!(result, Err(AssistError::StalePosition));
    }

    #[test]
    fn test_set_selection_validates_bounds() {
        let mut buffer = PadBuffer::from_text("ab\ncd");
        assert!(
            buffer
                .set_selection(Position::new(0, 2), Position::new(1, 2))
                .is_ok()
        );
        assert_eq!(
            buffer.set_selection(Position::new(0, 3), Position::new(1, 0)),
            Err(AssistError::StalePosition)
        );
    }

    #[test]
    fn test_cjk_columns_are_characters() {
        let mut buffer = PadBuffer::from_text("你好世界");
        buffer
            .replace_range(Position::new(0, 1), Position::new(0, 3), "x")
            .unwrap();
        assert_eq!(buffer.text(), "你x界");
    }
}
