//! Engine state: the open document's text, its tokenized form, mode and cursor.
//!
//! One `EngineState` describes one open document. The engine never edits it
//! field by field from the outside: every transition builds the next value
//! from the previous one with struct-update syntax, so observers only ever see
//! complete states.
//!
//! Line storage comes in three views kept in step by the engine:
//! - `lines`: the editable buffer;
//! - `original_lines`: the text as opened, frozen once loading finishes and
//!   only read by the diff;
//! - `document_lines`: tokens plus per-line change status, one entry per
//!   buffer line.

use std::path::PathBuf;

use core_syntax::DocumentLine;
use core_text::{Buffer, Position};

pub mod diff;

pub use diff::{apply_statuses, diff_lines};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    /// Reserved; nothing switches into it yet.
    Visual,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Visual => "VISUAL",
        }
    }
}

/// Waiting for the second key of a two-key Normal-mode command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubMode {
    /// `g` pressed.
    Go,
    /// `f` pressed.
    FindForward,
    /// `F` pressed.
    FindBackward,
    /// `i` pressed after an operator.
    TextObjectInside,
    /// `a` pressed after an operator.
    TextObjectAround,
    /// `s` pressed after an operator.
    TextObjectSurround,
    /// `r` pressed.
    ReplaceChar,
}

#[derive(Debug, Clone, Default)]
pub struct EngineState {
    pub file_path: Option<PathBuf>,
    /// Buffer text joined with `\n`.
    pub content: String,
    pub lines: Buffer,
    pub original_lines: Vec<String>,
    pub document_lines: Vec<DocumentLine>,
    pub mode: Mode,
    pub sub_mode: Option<SubMode>,
    pub cursor: Position,
    /// Last yanked text.
    pub register: Option<String>,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for already-known text: untokenized lines, all unmodified.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = Buffer::from_lines(lines);
        let document_lines = lines
            .lines()
            .iter()
            .enumerate()
            .map(|(i, l)| DocumentLine::plain(i, l))
            .collect();
        Self {
            content: lines.content(),
            original_lines: lines.lines().to_vec(),
            document_lines,
            lines,
            ..Self::default()
        }
    }

    pub fn with_cursor(self, line: usize, col: usize) -> Self {
        let cursor = self.lines.clamp(Position::new(line, col));
        Self { cursor, ..self }
    }

    pub fn with_mode(self, mode: Mode) -> Self {
        Self { mode, ..self }
    }

    pub fn current_line(&self) -> &str {
        self.lines.line(self.cursor.line).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_one_empty_line_in_normal() {
        let s = EngineState::new();
        assert_eq!(s.lines.line_count(), 1);
        assert_eq!(s.mode, Mode::Normal);
        assert_eq!(s.sub_mode, None);
        assert_eq!(s.cursor, Position::origin());
        assert_eq!(s.current_line(), "");
    }

    #[test]
    fn from_lines_populates_all_views() {
        let s = EngineState::from_lines(["a", "bc"]).with_cursor(5, 5);
        assert_eq!(s.content, "a\nbc");
        assert_eq!(s.original_lines, vec!["a", "bc"]);
        assert_eq!(s.document_lines.len(), 2);
        assert_eq!(s.cursor, Position::new(1, 2));
        assert_eq!(s.current_line(), "bc");
    }

    #[test]
    fn mode_labels() {
        assert_eq!(Mode::Insert.label(), "INSERT");
        assert_eq!(Mode::default().label(), "NORMAL");
    }
}
