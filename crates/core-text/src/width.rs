//! Display width of a char column.
//!
//! Shells that draw a block cursor on a monospace grid need the cell offset
//! of a char column, not the column itself: wide chars take two cells and a
//! tab advances to the next tab stop.

use unicode_width::UnicodeWidthChar;

/// Cell offset at which char column `col` of `line` starts.
pub fn display_col(line: &str, col: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    line.chars().take(col).fold(0, |cells, ch| match ch {
        '\t' => (cells / tab_width + 1) * tab_width,
        _ => cells + ch.width().unwrap_or(0),
    })
}
