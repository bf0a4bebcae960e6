//! Line-granular syntax tokenization.
//!
//! A [`Tokenizer`] turns lines of text into [`DocumentLine`]s of colored
//! [`CodeToken`]s using a TextMate grammar picked by file extension and a
//! TextMate theme. Tokenization is sequential: each line starts from the
//! [`LineState`] the previous line ended in, which is what carries open block
//! comments and strings across line breaks.

use std::path::PathBuf;

use thiserror::Error;

pub mod color;
pub mod tokenizer;

pub use color::{Color, ColorCache};
pub use tokenizer::{GuiColor, LineState, Tokenizer, load_theme};

/// Per-line change marker relative to the text as it was opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LineStatus {
    #[default]
    Unmodified,
    Modified,
    Deleted,
    Added,
}

/// A theme rule that matched a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Selector text of the rule, e.g. `comment` or `string.quoted`.
    pub name: String,
    /// `#rrggbb[aa]`, empty when the rule sets no foreground.
    pub foreground: String,
    /// `#rrggbb[aa]`, empty when the rule sets no background.
    pub background: String,
}

/// A run of text with one style. Never spans lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeToken {
    pub content: String,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    /// Matching theme rules, weakest first.
    pub scopes: Vec<Scope>,
}

impl CodeToken {
    /// Unstyled token.
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            foreground: None,
            background: None,
            scopes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLine {
    pub index: usize,
    pub tokens: Vec<CodeToken>,
    pub status: LineStatus,
}

impl DocumentLine {
    /// A line as a single unstyled token.
    pub fn plain(index: usize, text: &str) -> Self {
        Self {
            index,
            tokens: vec![CodeToken::plain(text)],
            status: LineStatus::Unmodified,
        }
    }

    /// The line's text, reassembled from its tokens.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.content.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub lines: Vec<DocumentLine>,
}

impl Document {
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(DocumentLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("no bundled theme named `{0}`")]
    UnknownTheme(String),
    #[error("failed to load theme file {path}")]
    ThemeFile {
        path: PathBuf,
        #[source]
        source: syntect::LoadingError,
    },
}
