//! Cursor motions.
//!
//! Every motion is a pure function of a buffer and a cursor that returns the
//! span it travelled, or `None` when it cannot move (the caller then abandons
//! whatever command was pending). Normal-mode keys map to motions through a
//! lookup table; the sub-mode motions (`gg`, `f{c}`, `F{c}`) take the second
//! key as an argument.
//!
//! Words are runs of word characters or single non-blank characters
//! (`\w+|\S`), so `foo,,bar` is four words. This is coarser than Vim's
//! keyword/punctuation grouping.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::{Buffer, Motion, Position, chars};

pub type MotionFn = fn(&Buffer, Position) -> Option<Motion>;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+|\S").expect("word pattern is a valid regex"));

const MOTIONS: &[(char, MotionFn)] = &[
    ('0', line_start),
    ('^', first_non_blank),
    ('$', line_end),
    ('w', word_forward),
    ('b', word_backward),
    ('e', word_end),
    ('h', left),
    ('l', right),
    ('j', down),
    ('k', up),
    ('G', last_line),
];

/// Motion bound to a Normal-mode key, if any.
pub fn lookup(key: char) -> Option<MotionFn> {
    MOTIONS.iter().find(|(k, _)| *k == key).map(|(_, f)| *f)
}

/// Apply `step` up to `count` times, each time from where the last one ended.
/// `None` only when the first application fails; a later failure or a step
/// that stops moving ends the repetition early.
pub fn repeat<F>(step: F, buf: &Buffer, cursor: Position, count: usize) -> Option<Motion>
where
    F: Fn(&Buffer, Position) -> Option<Motion>,
{
    let mut end = step(buf, cursor)?.end;
    for _ in 1..count.max(1) {
        match step(buf, end) {
            Some(m) if m.end != end => end = m.end,
            _ => break,
        }
    }
    Some(Motion::new(cursor, end))
}

/// Char-column spans of every word on a line.
pub fn word_spans(line: &str) -> Vec<Range<usize>> {
    WORD.find_iter(line)
        .map(|m| chars::col_of_byte(line, m.start())..chars::col_of_byte(line, m.end()))
        .collect()
}

pub fn line_start(_buf: &Buffer, c: Position) -> Option<Motion> {
    Some(Motion::new(c, Position::new(c.line, 0)))
}

pub fn first_non_blank(buf: &Buffer, c: Position) -> Option<Motion> {
    let col = buf.line(c.line)?.chars().position(|ch| !ch.is_whitespace())?;
    Some(Motion::new(c, Position::new(c.line, col)))
}

/// Last char of the line (column 0 on an empty line).
pub fn line_end(buf: &Buffer, c: Position) -> Option<Motion> {
    let len = buf.line_len(c.line);
    Some(Motion::new(c, Position::new(c.line, len.saturating_sub(1))))
}

pub fn left(_buf: &Buffer, c: Position) -> Option<Motion> {
    Some(Motion::new(c, Position::new(c.line, c.col.saturating_sub(1))))
}

/// One column right; may rest one past the last char.
pub fn right(buf: &Buffer, c: Position) -> Option<Motion> {
    let len = buf.line_len(c.line);
    Some(Motion::new(c, Position::new(c.line, (c.col + 1).min(len))))
}

pub fn down(buf: &Buffer, c: Position) -> Option<Motion> {
    let line = (c.line + 1).min(buf.last_line());
    Some(Motion::new(c, Position::new(line, c.col.min(buf.line_len(line)))))
}

pub fn up(buf: &Buffer, c: Position) -> Option<Motion> {
    let line = c.line.saturating_sub(1);
    Some(Motion::new(c, Position::new(line, c.col.min(buf.line_len(line)))))
}

pub fn last_line(buf: &Buffer, c: Position) -> Option<Motion> {
    let line = buf.last_line();
    Some(Motion::new(c, Position::new(line, buf.line_len(line))))
}

/// Start of the next word; the first word of the next line when the cursor is
/// on the last word. An empty next line counts as a stop.
pub fn word_forward(buf: &Buffer, c: Position) -> Option<Motion> {
    let line = buf.line(c.line)?;
    if let Some(span) = word_spans(line).into_iter().find(|s| s.start > c.col) {
        return Some(Motion::new(c, Position::new(c.line, span.start)));
    }
    let next = buf.line(c.line + 1)?;
    let col = word_spans(next).first().map_or(0, |s| s.start);
    Some(Motion::new(c, Position::new(c.line + 1, col)))
}

/// Start of the current word when inside it, else of the previous word; the
/// last word of the previous line when there is none before the cursor.
pub fn word_backward(buf: &Buffer, c: Position) -> Option<Motion> {
    let line = buf.line(c.line)?;
    if let Some(span) = word_spans(line).into_iter().rev().find(|s| s.start < c.col) {
        return Some(Motion::new(c, Position::new(c.line, span.start)));
    }
    if c.line == 0 {
        return None;
    }
    let prev = buf.line(c.line - 1)?;
    let col = word_spans(prev).last().map_or(0, |s| s.start);
    Some(Motion::new(c, Position::new(c.line - 1, col)))
}

/// Last char of the current word, or of the next one when already at a word
/// end. Falls through to the first word of the next line.
pub fn word_end(buf: &Buffer, c: Position) -> Option<Motion> {
    let line = buf.line(c.line)?;
    if let Some(span) = word_spans(line).into_iter().find(|s| s.end - 1 > c.col) {
        return Some(Motion::new(c, Position::new(c.line, span.end - 1)));
    }
    let next = buf.line(c.line + 1)?;
    let span = word_spans(next).into_iter().next()?;
    Some(Motion::new(c, Position::new(c.line + 1, span.end - 1)))
}

/// Second key of a `g` sequence. Only `gg` (top of the buffer) is bound.
pub fn go(key: char, _buf: &Buffer, c: Position) -> Option<Motion> {
    match key {
        'g' => Some(Motion::new(c, Position::origin())),
        _ => None,
    }
}

/// Next occurrence of `target` strictly after the cursor on the same line.
pub fn find_forward(target: char, buf: &Buffer, c: Position) -> Option<Motion> {
    let line = buf.line(c.line)?;
    let offset = line.chars().skip(c.col + 1).position(|ch| ch == target)?;
    Some(Motion::new(c, Position::new(c.line, c.col + 1 + offset)))
}

/// Previous occurrence of `target` strictly before the cursor on the same line.
pub fn find_backward(target: char, buf: &Buffer, c: Position) -> Option<Motion> {
    let line = buf.line(c.line)?;
    let (col, _) = line
        .chars()
        .take(c.col)
        .enumerate()
        .filter(|(_, ch)| *ch == target)
        .last()?;
    Some(Motion::new(c, Position::new(c.line, col)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(lines: &[&str]) -> Buffer {
        Buffer::from_lines(lines.iter().copied())
    }

    fn end_of(key: char, b: &Buffer, line: usize, col: usize) -> Option<Position> {
        lookup(key).and_then(|f| f(b, Position::new(line, col))).map(|m| m.end)
    }

    #[test]
    fn horizontal_and_line_boundaries() {
        let b = buf(&["abc", "def"]);
        let mut pos = Position::origin();
        for expected in [1, 2, 3, 3] {
            pos = right(&b, pos).unwrap().end;
            assert_eq!(pos, Position::new(0, expected));
        }
        assert_eq!(end_of('h', &b, 0, 0), Some(Position::new(0, 0)));
        assert_eq!(end_of('$', &b, 0, 0), Some(Position::new(0, 2)));
        assert_eq!(end_of('0', &b, 0, 2), Some(Position::new(0, 0)));
    }

    #[test]
    fn line_end_and_first_non_blank_on_empty_lines() {
        let b = buf(&["", "   ", "  x"]);
        assert_eq!(end_of('$', &b, 0, 0), Some(Position::new(0, 0)));
        assert_eq!(end_of('^', &b, 1, 2), None);
        assert_eq!(end_of('^', &b, 2, 0), Some(Position::new(2, 2)));
    }

    #[test]
    fn vertical_clamps_column() {
        let b = buf(&["longer", "ab", "xyz"]);
        assert_eq!(end_of('j', &b, 0, 5), Some(Position::new(1, 2)));
        assert_eq!(end_of('k', &b, 1, 1), Some(Position::new(0, 1)));
        assert_eq!(end_of('j', &b, 2, 1), Some(Position::new(2, 1)));
        assert_eq!(end_of('G', &b, 0, 0), Some(Position::new(2, 3)));
    }

    #[test]
    fn word_forward_and_backward_basic() {
        let b = buf(&["foo, bar baz", "qux!! zip"]);
        assert_eq!(end_of('w', &b, 0, 0), Some(Position::new(0, 3)));
        assert_eq!(end_of('w', &b, 0, 3), Some(Position::new(0, 5)));
        assert_eq!(end_of('w', &b, 0, 6), Some(Position::new(0, 9)));
        assert_eq!(end_of('b', &b, 0, 10), Some(Position::new(0, 9)));
        assert_eq!(end_of('b', &b, 0, 9), Some(Position::new(0, 5)));
        assert_eq!(end_of('e', &b, 0, 5), Some(Position::new(0, 7)));
        assert_eq!(end_of('e', &b, 0, 7), Some(Position::new(0, 11)));
    }

    #[test]
    fn word_motion_cross_line_edges() {
        let b = buf(&["foo bar", "  qux zip"]);
        assert_eq!(end_of('w', &b, 0, 4), Some(Position::new(1, 2)));
        assert_eq!(end_of('b', &b, 1, 2), Some(Position::new(0, 4)));
        assert_eq!(end_of('e', &b, 0, 6), Some(Position::new(1, 4)));
        assert_eq!(end_of('w', &b, 1, 6), None);
        assert_eq!(end_of('b', &b, 0, 0), None);
        assert_eq!(end_of('e', &b, 1, 8), None);
    }

    #[test]
    fn word_spans_are_char_columns() {
        assert_eq!(word_spans("é, x"), vec![0..1, 1..2, 3..4]);
    }

    #[test]
    fn find_char_is_exclusive_of_cursor() {
        let b = buf(&["a.b.c"]);
        let c = Position::new(0, 1);
        assert_eq!(find_forward('.', &b, c).map(|m| m.end), Some(Position::new(0, 3)));
        assert_eq!(find_backward('.', &b, Position::new(0, 3)).map(|m| m.end), Some(c));
        assert_eq!(find_forward('z', &b, c), None);
        assert_eq!(find_backward('.', &b, c), None);
    }

    #[test]
    fn go_top_only_for_g() {
        let b = buf(&["a", "b"]);
        let c = Position::new(1, 1);
        assert_eq!(go('g', &b, c).map(|m| m.end), Some(Position::origin()));
        assert_eq!(go('x', &b, c), None);
    }

    #[test]
    fn repeat_applies_count_and_stops_early() {
        let b = buf(&["a b c"]);
        let m = repeat(word_forward, &b, Position::origin(), 2).unwrap();
        assert_eq!(m, Motion::new(Position::origin(), Position::new(0, 4)));
        let m = repeat(word_forward, &b, Position::origin(), 9).unwrap();
        assert_eq!(m.end, Position::new(0, 4));
        assert_eq!(repeat(word_backward, &b, Position::origin(), 3), None);
    }

    #[test]
    fn repeat_stops_once_the_cursor_is_stuck() {
        let b = buf(&["abc"]);
        let m = repeat(down, &b, Position::new(0, 1), usize::MAX).unwrap();
        assert_eq!(m.end, Position::new(0, 1));
        let m = repeat(right, &b, Position::origin(), usize::MAX).unwrap();
        assert_eq!(m.end, Position::new(0, 3));
    }
}
