//! Plain-text dump of the engine's document for the terminal.
//!
//! Each line is printed behind a one-char status gutter (`M` modified, `+`
//! added, `-` deleted). The cursor line is followed by a caret row pointing
//! at the cursor cell, and a status row closes the dump.

use std::io::{self, Write};

use core_engine::Engine;
use core_syntax::{CodeToken, DocumentLine, LineStatus};
use core_text::display_col;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub color: bool,
    /// List every token below its line.
    pub tokens: bool,
    pub tab_width: usize,
}

fn gutter(status: LineStatus) -> char {
    match status {
        LineStatus::Unmodified => ' ',
        LineStatus::Modified => 'M',
        LineStatus::Added => '+',
        LineStatus::Deleted => '-',
    }
}

/// Replace tabs with spaces up to the next tab stop, starting `cells` into
/// the line. Returns the text and the cell count after it.
fn expand_tabs(text: &str, mut cells: usize, tab_width: usize) -> (String, usize) {
    let tab_width = tab_width.max(1);
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '\t' {
            let next = (cells / tab_width + 1) * tab_width;
            out.extend(std::iter::repeat_n(' ', next - cells));
            cells = next;
        } else {
            out.push(ch);
            cells += ch.width().unwrap_or(0);
        }
    }
    (out, cells)
}

fn write_line<W: Write>(out: &mut W, line: &DocumentLine, opts: &ReportOptions) -> io::Result<()> {
    write!(out, "{} ", gutter(line.status))?;
    let mut cells = 0;
    for token in &line.tokens {
        let (text, next) = expand_tabs(&token.content, cells, opts.tab_width);
        cells = next;
        match token.foreground.filter(|_| opts.color) {
            Some(c) => queue!(
                out,
                SetForegroundColor(Color::Rgb { r: c.r, g: c.g, b: c.b }),
                Print(text),
                ResetColor
            )?,
            None => queue!(out, Print(text))?,
        }
    }
    writeln!(out)
}

fn describe(token: &CodeToken) -> String {
    let fg = token.foreground.map(|c| c.to_hex()).unwrap_or_else(|| "-".into());
    let scopes: Vec<&str> = token.scopes.iter().map(|s| s.name.as_str()).collect();
    format!("{:?} fg={} scopes=[{}]", token.content, fg, scopes.join(", "))
}

pub fn write_report<W: Write>(
    out: &mut W,
    engine: &Engine,
    opts: &ReportOptions,
) -> io::Result<()> {
    let state = engine.state();
    let cursor = state.cursor;
    for line in engine.document() {
        write_line(out, line, opts)?;
        if opts.tokens {
            for token in &line.tokens {
                writeln!(out, "    {}", describe(token))?;
            }
        }
        if line.index == cursor.line {
            let text = state.lines.line(cursor.line).unwrap_or_default();
            let cell = display_col(text, cursor.col, opts.tab_width);
            writeln!(out, "  {}^", " ".repeat(cell))?;
        }
    }
    writeln!(
        out,
        "-- {} -- {}:{}",
        state.mode.label(),
        cursor.line + 1,
        cursor.col + 1
    )?;
    out.flush()
}
