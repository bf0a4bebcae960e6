//! Text objects (`iw`, `a"`, `i(` ...).
//!
//! Resolution is single-line: a delimiter pair must open and close on the
//! cursor line. The resolved [`Motion`] spans the object end-exclusive, from
//! the object's first column to one past its last.

use crate::motion::word_spans;
use crate::{Buffer, Motion, Position};

/// Whether the object includes its surroundings (`a`) or not (`i`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    Inner,
    Around,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextObjectKind {
    Word,
    /// Same char opens and closes (`"`, `'`, `` ` ``).
    Quote(char),
    /// Nesting pair such as `(`/`)`.
    Pair { open: char, close: char },
}

impl TextObjectKind {
    pub fn from_key(key: char) -> Option<Self> {
        let kind = match key {
            'w' => Self::Word,
            '"' | '\'' | '`' => Self::Quote(key),
            '(' | ')' | 'b' => Self::Pair { open: '(', close: ')' },
            '[' | ']' => Self::Pair { open: '[', close: ']' },
            '{' | '}' | 'B' => Self::Pair { open: '{', close: '}' },
            '<' | '>' => Self::Pair { open: '<', close: '>' },
            _ => return None,
        };
        Some(kind)
    }
}

/// Resolve the object selected by `key` around `cursor`.
pub fn resolve(key: char, extent: Extent, buf: &Buffer, cursor: Position) -> Option<Motion> {
    let kind = TextObjectKind::from_key(key)?;
    let line: Vec<char> = buf.line(cursor.line)?.chars().collect();
    let (start, end) = match kind {
        TextObjectKind::Word => word(&line, buf.line(cursor.line)?, cursor.col, extent)?,
        TextObjectKind::Quote(q) => quoted(&line, q, cursor.col, extent)?,
        TextObjectKind::Pair { open, close } => paired(&line, open, close, cursor.col, extent)?,
    };
    Some(Motion::new(
        Position::new(cursor.line, start),
        Position::new(cursor.line, end),
    ))
}

fn word(line: &[char], text: &str, col: usize, extent: Extent) -> Option<(usize, usize)> {
    if col >= line.len() {
        return None;
    }
    let blank_run = |from: usize| {
        let mut s = from;
        while s > 0 && line[s - 1].is_whitespace() {
            s -= 1;
        }
        let mut e = from;
        while e < line.len() && line[e].is_whitespace() {
            e += 1;
        }
        (s, e)
    };
    let (s, e) = match word_spans(text).into_iter().find(|r| r.contains(&col)) {
        Some(r) => (r.start, r.end),
        None => blank_run(col),
    };
    if extent == Extent::Inner {
        return Some((s, e));
    }
    let trailing = line[e..].iter().take_while(|c| c.is_whitespace()).count();
    if trailing > 0 {
        return Some((s, e + trailing));
    }
    let leading = line[..s].iter().rev().take_while(|c| c.is_whitespace()).count();
    Some((s - leading, e))
}

fn quoted(line: &[char], q: char, col: usize, extent: Extent) -> Option<(usize, usize)> {
    let marks: Vec<usize> = line
        .iter()
        .enumerate()
        .filter(|(_, c)| **c == q)
        .map(|(i, _)| i)
        .collect();
    let pair = marks
        .chunks_exact(2)
        .find(|p| p[0] <= col && col <= p[1])
        .or_else(|| marks.chunks_exact(2).find(|p| p[0] > col))?;
    Some(match extent {
        Extent::Inner => (pair[0] + 1, pair[1]),
        Extent::Around => (pair[0], pair[1] + 1),
    })
}

fn paired(
    line: &[char],
    open: char,
    close: char,
    col: usize,
    extent: Extent,
) -> Option<(usize, usize)> {
    let col = col.min(line.len().checked_sub(1)?);
    let start = if line[col] == open {
        col
    } else {
        let mut depth = 0usize;
        let mut found = None;
        // a close under the cursor belongs to the pair being searched for
        let upto = if line[col] == close { col } else { col + 1 };
        for i in (0..upto).rev() {
            if line[i] == close {
                depth += 1;
            } else if line[i] == open {
                if depth == 0 {
                    found = Some(i);
                    break;
                }
                depth -= 1;
            }
        }
        found?
    };
    let mut depth = 0usize;
    let end = (start + 1..line.len()).find(|&i| {
        if line[i] == open {
            depth += 1;
        } else if line[i] == close {
            if depth == 0 {
                return true;
            }
            depth -= 1;
        }
        false
    })?;
    Some(match extent {
        Extent::Inner => (start + 1, end),
        Extent::Around => (start, end + 1),
    })
}
