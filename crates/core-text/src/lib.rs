//! Line buffer, positions and motions.
//!
//! The buffer is a plain vector of lines without terminators. Columns count
//! Unicode scalar values (`char`s); every mutator clamps its input position
//! into `[0, line_count - 1] x [0, line_len]` before touching the text, so a
//! position handed back by any method of [`Buffer`] is always in bounds.

pub mod motion;
pub mod text_object;
pub mod width;

pub use width::display_col;

/// A position inside a buffer expressed as (line index, char column within that line).
///
/// Ordering is document order: by line, then by column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
    pub fn origin() -> Self {
        Self { line: 0, col: 0 }
    }
    pub fn clamp_to<F>(&mut self, line_count: usize, mut line_len_fn: F)
    where
        F: FnMut(usize) -> usize,
    {
        if line_count == 0 {
            self.line = 0;
            self.col = 0;
            return;
        }
        if self.line >= line_count {
            self.line = line_count - 1;
        }
        let max_len = line_len_fn(self.line);
        if self.col > max_len {
            self.col = max_len;
        }
    }
}

/// The span a single motion function travelled. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion {
    pub start: Position,
    pub end: Position,
}

impl Motion {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// The motion's endpoints in document order.
    pub fn span(&self) -> (Position, Position) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }
}

/// Char-indexed helpers over `&str`.
pub mod chars {
    /// Byte offset of char column `col`; `s.len()` when `col` is at or past the end.
    pub fn byte_index(s: &str, col: usize) -> usize {
        s.char_indices().nth(col).map_or(s.len(), |(b, _)| b)
    }

    pub fn count(s: &str) -> usize {
        s.chars().count()
    }

    /// Char column of a byte offset that lies on a char boundary.
    pub fn col_of_byte(s: &str, byte: usize) -> usize {
        s[..byte].chars().count()
    }

    /// Slice by char columns, clamped to the string.
    pub fn slice(s: &str, from: usize, to: usize) -> &str {
        let a = byte_index(s, from);
        let b = byte_index(s, to.max(from));
        &s[a..b]
    }
}

/// Ordered lines of text. Always holds at least one (possibly empty) line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    lines: Vec<String>,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    /// A buffer with a single empty line.
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.is_empty() {
            return Self::new();
        }
        Self { lines }
    }

    /// Split `content` the way `str::lines` does (`\n` or `\r\n`, no trailing empty line).
    pub fn from_content(content: &str) -> Self {
        Self::from_lines(content.lines())
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    /// Length of a line in chars; 0 for lines that do not exist.
    pub fn line_len(&self, idx: usize) -> usize {
        self.line(idx).map_or(0, chars::count)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The whole text joined with `\n`.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    pub fn last_line(&self) -> usize {
        self.lines.len() - 1
    }

    pub fn clamp(&self, pos: Position) -> Position {
        let mut pos = pos;
        pos.clamp_to(self.lines.len(), |l| self.line_len(l));
        pos
    }

    /// Append a line that arrived from a streaming load. The first streamed line
    /// replaces the placeholder empty line a fresh buffer starts with.
    pub fn push_loaded(&mut self, already_loaded: usize, line: String) {
        if already_loaded == 0 {
            self.lines.truncate(1);
            self.lines[0] = line;
        } else {
            self.lines.push(line);
        }
    }

    /// Index of the first line that differs from `other`. When one buffer is a
    /// prefix of the other this is the shorter length.
    pub fn first_difference(&self, other: &Buffer) -> usize {
        self.lines
            .iter()
            .zip(other.lines.iter())
            .position(|(a, b)| a != b)
            .unwrap_or_else(|| self.lines.len().min(other.lines.len()))
    }

    /// Insert single-line text at `pos`; returns the position just after it.
    pub fn insert_str(&mut self, pos: Position, text: &str) -> Position {
        let pos = self.clamp(pos);
        let line = &mut self.lines[pos.line];
        let b = chars::byte_index(line, pos.col);
        line.insert_str(b, text);
        Position::new(pos.line, pos.col + chars::count(text))
    }

    /// Insert text that may contain newlines. Each `\n` starts a new line and a
    /// `\r` ending a segment is dropped. Text that followed `pos` ends up after
    /// the last inserted segment; the returned position is the end of that segment.
    pub fn insert_text(&mut self, pos: Position, text: &str) -> Position {
        let pos = self.clamp(pos);
        let mut segments = text.split('\n').map(|s| s.strip_suffix('\r').unwrap_or(s));
        let first = segments.next().unwrap_or_default();

        let line = &mut self.lines[pos.line];
        let b = chars::byte_index(line, pos.col);
        let tail = line.split_off(b);
        line.push_str(first);
        let mut cursor = Position::new(pos.line, pos.col + chars::count(first));

        for segment in segments {
            self.lines.insert(cursor.line + 1, segment.to_string());
            cursor = Position::new(cursor.line + 1, chars::count(segment));
        }
        self.lines[cursor.line].push_str(&tail);
        cursor
    }

    /// Split the line at `pos`; returns the start of the new line.
    pub fn split_line(&mut self, pos: Position) -> Position {
        let pos = self.clamp(pos);
        let line = &mut self.lines[pos.line];
        let b = chars::byte_index(line, pos.col);
        let tail = line.split_off(b);
        self.lines.insert(pos.line + 1, tail);
        Position::new(pos.line + 1, 0)
    }

    /// Append line `idx` to the line above it. Returns the join point, or
    /// `None` for the first line (or a line that does not exist).
    pub fn join_with_previous(&mut self, idx: usize) -> Option<Position> {
        if idx == 0 || idx >= self.lines.len() {
            return None;
        }
        let current = self.lines.remove(idx);
        let prev = &mut self.lines[idx - 1];
        let col = chars::count(prev);
        prev.push_str(&current);
        Some(Position::new(idx - 1, col))
    }

    /// Backspace semantics: delete the char left of `pos`, or join with the
    /// previous line at column 0. `None` at the very start of the buffer.
    pub fn delete_char_before(&mut self, pos: Position) -> Option<Position> {
        let pos = self.clamp(pos);
        if pos.col == 0 {
            return self.join_with_previous(pos.line);
        }
        let line = &mut self.lines[pos.line];
        let b0 = chars::byte_index(line, pos.col - 1);
        let b1 = chars::byte_index(line, pos.col);
        line.replace_range(b0..b1, "");
        Some(Position::new(pos.line, pos.col - 1))
    }

    /// Overwrite the char under `pos`. Returns false when there is none.
    pub fn replace_char(&mut self, pos: Position, ch: char) -> bool {
        let Some(line) = self.lines.get_mut(pos.line) else {
            return false;
        };
        if pos.col >= chars::count(line) {
            return false;
        }
        let b0 = chars::byte_index(line, pos.col);
        let b1 = chars::byte_index(line, pos.col + 1);
        let mut utf8 = [0u8; 4];
        line.replace_range(b0..b1, ch.encode_utf8(&mut utf8));
        true
    }

    /// Text in the end-exclusive span between two positions (either order),
    /// lines joined with `\n`.
    pub fn text_between(&self, a: Position, b: Position) -> String {
        let (start, end) = Motion::new(self.clamp(a), self.clamp(b)).span();
        if start.line == end.line {
            return chars::slice(&self.lines[start.line], start.col, end.col).to_string();
        }
        let first = &self.lines[start.line];
        let mut out = chars::slice(first, start.col, chars::count(first)).to_string();
        for line in &self.lines[start.line + 1..end.line] {
            out.push('\n');
            out.push_str(line);
        }
        out.push('\n');
        out.push_str(chars::slice(&self.lines[end.line], 0, end.col));
        out
    }

    /// Remove the end-exclusive span between two positions (either order) and
    /// return the removed text.
    pub fn delete_between(&mut self, a: Position, b: Position) -> String {
        let (start, end) = Motion::new(self.clamp(a), self.clamp(b)).span();
        let removed = self.text_between(start, end);
        if start.line == end.line {
            let line = &mut self.lines[start.line];
            let b0 = chars::byte_index(line, start.col);
            let b1 = chars::byte_index(line, end.col);
            line.replace_range(b0..b1, "");
            return removed;
        }
        let tail_at = chars::byte_index(&self.lines[end.line], end.col);
        let tail = self.lines[end.line][tail_at..].to_string();
        let head_at = chars::byte_index(&self.lines[start.line], start.col);
        self.lines[start.line].truncate(head_at);
        self.lines[start.line].push_str(&tail);
        self.lines.drain(start.line + 1..=end.line);
        removed
    }
}
