//! Flattened snapshots and offset ↔ position mapping.
//!
//! The analysis service reports issue spans as absolute character offsets
//! into the document text with lines joined by single newlines. This module
//! converts those offsets into editable `(line, column)` coordinates and
//! back. A cumulative line-start table is built once per snapshot and both
//! mapping directions query it with binary search; scanning the text for the
//! reported substring is deliberately not offered, because duplicate
//! substrings elsewhere in the document would misplace edits.

use crate::error::AssistError;
use std::cmp::Ordering;

/// Position coordinates (line and column numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based column in characters within the logical line.
    pub column: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// An immutable snapshot of the document text, lines joined with `\n`.
///
/// This is the coordinate space for externally reported offsets. A snapshot
/// is built once per analysis pass and owned exclusively by one session;
/// every offset from that pass is resolved against the same snapshot.
#[derive(Debug, Clone)]
pub struct FlattenedDocument {
    text: String,
    /// Character length of each line, excluding newlines.
    line_lengths: Vec<usize>,
    /// Cumulative character offset of each line start (+1 per joining newline).
    line_starts: Vec<usize>,
    /// Byte offset of each character, plus a trailing sentinel at `text.len()`.
    char_to_byte: Vec<usize>,
}

impl FlattenedDocument {
    /// Build a snapshot from raw text.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_lengths = Vec::new();
        let mut line_starts = vec![0];
        let mut char_to_byte = Vec::with_capacity(text.len() + 1);

        let mut current_line_len = 0;
        let mut char_count = 0;
        for (byte_offset, ch) in text.char_indices() {
            char_to_byte.push(byte_offset);
            char_count += 1;
            if ch == '\n' {
                line_lengths.push(current_line_len);
                line_starts.push(char_count);
                current_line_len = 0;
            } else {
                current_line_len += 1;
            }
        }
        char_to_byte.push(text.len());
        line_lengths.push(current_line_len);

        Self {
            text,
            line_lengths,
            line_starts,
            char_to_byte,
        }
    }

    /// Get the full flattened text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Total character count of the flattened text, newlines included.
    pub fn len_chars(&self) -> usize {
        self.char_to_byte.len() - 1
    }

    /// Get total line count (N newlines produce N+1 lines).
    pub fn line_count(&self) -> usize {
        self.line_lengths.len()
    }

    /// Character length of the given line, excluding its newline.
    pub fn line_length(&self, line: usize) -> Option<usize> {
        self.line_lengths.get(line).copied()
    }

    /// Whether the half-open span `offset..offset + length` lies inside the
    /// snapshot.
    pub fn contains_span(&self, offset: usize, length: usize) -> bool {
        offset
            .checked_add(length)
            .is_some_and(|end| end <= self.len_chars())
    }

    /// Map an absolute character offset to editable coordinates.
    ///
    /// An offset sitting exactly on a line boundary maps to column 0 of the
    /// following line, never to the previous line's newline slot;
    /// `offset == len_chars()` maps to the end of the last line. Offsets
    /// beyond the text fail with [`AssistError::OutOfRange`].
    pub fn position_of(&self, offset: usize) -> Result<Position, AssistError> {
        if offset > self.len_chars() {
            return Err(AssistError::OutOfRange);
        }
        // Last line start <= offset.
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        Ok(Position::new(line, offset - self.line_starts[line]))
    }

    /// Map editable coordinates back to an absolute character offset.
    ///
    /// Exact inverse of [`position_of`](Self::position_of): for every valid
    /// offset `o`, `offset_of(position_of(o)) == o`. A column is allowed to
    /// equal the line length (the slot just past the last character); any
    /// position beyond that fails with [`AssistError::OutOfRange`].
    pub fn offset_of(&self, position: Position) -> Result<usize, AssistError> {
        let line_len = self
            .line_lengths
            .get(position.line)
            .ok_or(AssistError::OutOfRange)?;
        if position.column > *line_len {
            return Err(AssistError::OutOfRange);
        }
        Ok(self.line_starts[position.line] + position.column)
    }

    /// Extract the substring covering `offset..offset + length`, or `None`
    /// when the span falls outside the snapshot.
    pub fn slice(&self, offset: usize, length: usize) -> Option<&str> {
        let end = offset.checked_add(length)?;
        if end > self.len_chars() {
            return None;
        }
        Some(&self.text[self.char_to_byte[offset]..self.char_to_byte[end]])
    }
}
