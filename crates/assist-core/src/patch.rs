//! Applying replacements to the live document.
//!
//! The kernel never owns the editable document; it drives it through the
//! narrow [`HostEditor`] capability set. [`apply_replacement`] is the single
//! mutation path: one focus → select → replace transaction that leaves the
//! caret just after the inserted text.

use crate::error::AssistError;
use crate::position::Position;

/// The host-editor capabilities consumed by the assist kernel.
///
/// Implementations wrap whatever surface actually owns the text: the
/// in-process [`PadBuffer`](crate::PadBuffer) or a bridge to an embedding
/// editor. Coordinates are `(line, column)` pairs in characters.
pub trait HostEditor {
    /// Full document text, lines joined with `\n`.
    fn document_text(&self) -> String;

    /// Current selection as an ordered `(start, end)` pair; collapsed when
    /// both ends are equal.
    fn selection(&self) -> (Position, Position);

    /// Set the selection. Fails with [`AssistError::StalePosition`] when
    /// either end does not exist in the document.
    fn set_selection(&mut self, start: Position, end: Position) -> Result<(), AssistError>;

    /// Replace `[start, end)` with `text`. Fails with
    /// [`AssistError::StalePosition`] when the range does not exist.
    fn replace_range(
        &mut self,
        start: Position,
        end: Position,
        text: &str,
    ) -> Result<(), AssistError>;

    /// Move input focus to the editor.
    fn focus(&mut self);
}

/// Caret position immediately after inserting `text` at `start`.
fn caret_after(start: Position, text: &str) -> Position {
    let newlines = text.matches('\n').count();
    if newlines == 0 {
        Position::new(start.line, start.column + text.chars().count())
    } else {
        let tail = text.rsplit('\n').next().unwrap_or("");
        Position::new(start.line + newlines, tail.chars().count())
    }
}

/// Replace `[start, end)` with `replacement` as one atomic transaction.
///
/// Focuses the editor, selects the exact range, replaces it, and leaves a
/// collapsed selection just after the inserted text. Returns that caret
/// position.
///
/// The range must be derived from a snapshot captured immediately before
/// this call; a reversed range or one the host no longer recognises fails
/// with [`AssistError::StalePosition`] and the caller must re-run its
/// analysis rather than guess.
pub fn apply_replacement(
    host: &mut dyn HostEditor,
    start: Position,
    end: Position,
    replacement: &str,
) -> Result<Position, AssistError> {
    if start > end {
        return Err(AssistError::StalePosition);
    }
    host.focus();
    host.set_selection(start, end)?;
    host.replace_range(start, end, replacement)?;
    let caret = caret_after(start, replacement);
    host.set_selection(caret, caret)?;
    Ok(caret)
}
