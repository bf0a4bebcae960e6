//! syntect-backed tokenizer.

use std::cmp::Ordering;
use std::path::Path;

use core_config::ThemeConfig;
use syntect::easy::ScopeRegionIterator;
use syntect::highlighting::{ScopeSelector, Theme, ThemeSet};
use syntect::parsing::{ParseState, Scope as SyntectScope, ScopeStack, SyntaxSet};
use tracing::{debug, info, warn};

use crate::{CodeToken, Color, ColorCache, Document, DocumentLine, LineStatus, Scope, SyntaxError};

/// Parser state at the end of a line: the grammar's context stack plus the
/// scopes still open. Feed it to the next line's tokenization.
#[derive(Debug, Clone)]
pub struct LineState {
    parse: ParseState,
    scopes: ScopeStack,
}

/// Editor-level colors defined by the theme rather than by a token rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuiColor {
    Foreground,
    Background,
    Caret,
    LineHighlight,
    Selection,
    Gutter,
    GutterForeground,
}

/// Load the theme named by the config: the `.tmTheme` path when set, else a
/// bundled theme by name.
pub fn load_theme(config: &ThemeConfig) -> Result<Theme, SyntaxError> {
    if let Some(path) = &config.path {
        return ThemeSet::get_theme(path).map_err(|source| SyntaxError::ThemeFile {
            path: path.clone(),
            source,
        });
    }
    ThemeSet::load_defaults()
        .themes
        .remove(&config.name)
        .ok_or_else(|| SyntaxError::UnknownTheme(config.name.clone()))
}

pub struct Tokenizer {
    syntaxes: SyntaxSet,
    theme: Theme,
    grammar: Option<String>,
    colors: ColorCache,
}

impl Tokenizer {
    pub fn new(theme: Theme) -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_nonewlines(),
            theme,
            grammar: None,
            colors: ColorCache::new(),
        }
    }

    /// Build from config, falling back to the default bundled theme (then to an
    /// empty theme) when the configured one cannot be loaded.
    pub fn from_config(config: &ThemeConfig) -> Self {
        let theme = load_theme(config).unwrap_or_else(|e| {
            warn!(target: "syntax.theme", error = %e, fallback = ThemeConfig::DEFAULT_NAME, "theme_load_failed");
            ThemeSet::load_defaults()
                .themes
                .remove(ThemeConfig::DEFAULT_NAME)
                .unwrap_or_default()
        });
        Self::new(theme)
    }

    /// Select the grammar registered for `extension`. `None` (plain text
    /// tokens from now on) is not an error.
    pub fn load_grammar(&mut self, extension: &str) -> Option<&str> {
        self.grammar = self
            .syntaxes
            .find_syntax_by_extension(extension)
            .map(|s| s.name.clone());
        info!(target: "syntax.tokenize", extension, grammar = ?self.grammar, "grammar_selected");
        self.grammar.as_deref()
    }

    /// [`load_grammar`](Self::load_grammar) for the extension of `path`.
    pub fn load_grammar_for_path(&mut self, path: &Path) -> Option<&str> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        self.load_grammar(ext)
    }

    pub fn gui_color(&mut self, key: GuiColor) -> Option<Color> {
        let s = &self.theme.settings;
        let color = match key {
            GuiColor::Foreground => s.foreground,
            GuiColor::Background => s.background,
            GuiColor::Caret => s.caret,
            GuiColor::LineHighlight => s.line_highlight,
            GuiColor::Selection => s.selection,
            GuiColor::Gutter => s.gutter,
            GuiColor::GutterForeground => s.gutter_foreground,
        }?;
        self.colors.resolve(&Color::from(color).to_hex())
    }

    fn fresh_state(&self) -> Option<LineState> {
        let name = self.grammar.as_deref()?;
        let syntax = self.syntaxes.find_syntax_by_name(name)?;
        Some(LineState {
            parse: ParseState::new(syntax),
            scopes: ScopeStack::new(),
        })
    }

    /// Tokenize one line starting from `continuation` (or from the grammar's
    /// initial state when `None`). Returns the line and the state to feed the
    /// next line; the state is `None` when there is no grammar or the grammar
    /// failed on this line.
    pub fn tokenize_line(
        &mut self,
        line: &str,
        index: usize,
        continuation: Option<LineState>,
    ) -> (DocumentLine, Option<LineState>) {
        let Some(mut state) = continuation.or_else(|| self.fresh_state()) else {
            return (DocumentLine::plain(index, line), None);
        };
        let ops = match state.parse.parse_line(line, &self.syntaxes) {
            Ok(ops) => ops,
            Err(e) => {
                warn!(target: "syntax.tokenize", line = index, error = %e, "grammar_error_plain_fallback");
                return (DocumentLine::plain(index, line), None);
            }
        };

        let mut tokens = Vec::new();
        for (text, op) in ScopeRegionIterator::new(&ops, line) {
            if let Err(e) = state.scopes.apply(op) {
                debug!(target: "syntax.tokenize", line = index, error = ?e, "scope_op_rejected");
            }
            if text.is_empty() {
                continue;
            }
            tokens.push(style_token(
                &self.theme,
                &mut self.colors,
                text,
                state.scopes.as_slice(),
            ));
        }
        if tokens.is_empty() {
            tokens.push(CodeToken::plain(""));
        }
        let doc_line = DocumentLine {
            index,
            tokens,
            status: LineStatus::Unmodified,
        };
        (doc_line, Some(state))
    }

    /// Tokenize `lines[start..]` from `continuation`. Returns the lines and the
    /// end-of-line state of each, both indexed from `start`.
    pub fn tokenize_from<S: AsRef<str>>(
        &mut self,
        lines: &[S],
        start: usize,
        continuation: Option<LineState>,
    ) -> (Vec<DocumentLine>, Vec<Option<LineState>>) {
        let tail = lines.get(start..).unwrap_or_default();
        let mut out = Vec::with_capacity(tail.len());
        let mut states = Vec::with_capacity(tail.len());
        let mut state = continuation;
        for (offset, line) in tail.iter().enumerate() {
            let (doc_line, next) = self.tokenize_line(line.as_ref(), start + offset, state);
            states.push(next.clone());
            state = next;
            out.push(doc_line);
        }
        debug!(target: "syntax.tokenize", start, lines = out.len(), "tokenized_suffix");
        (out, states)
    }

    /// Select the grammar for `extension` and tokenize all of `content`.
    /// Empty content is one empty line.
    pub fn tokenize_document(&mut self, extension: &str, content: &str) -> Document {
        self.load_grammar(extension);
        let mut lines: Vec<&str> = content.lines().collect();
        if lines.is_empty() {
            lines.push("");
        }
        let (lines, _) = self.tokenize_from(&lines[..], 0, None);
        Document { lines }
    }
}

fn selector_name(selector: &ScopeSelector) -> String {
    selector
        .path
        .as_slice()
        .iter()
        .map(|s| s.build_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn hex_or_empty(color: Option<syntect::highlighting::Color>) -> String {
    color.map(|c| Color::from(c).to_hex()).unwrap_or_default()
}

/// Resolve a token's colors from every theme rule matching its scope stack.
/// Rules apply weakest match first so the most specific one wins; ties go to
/// the rule listed later in the theme.
fn style_token(
    theme: &Theme,
    colors: &mut ColorCache,
    text: &str,
    stack: &[SyntectScope],
) -> CodeToken {
    let mut matched: Vec<(f64, usize, &ScopeSelector)> = Vec::new();
    for (i, item) in theme.scopes.iter().enumerate() {
        for selector in &item.scope.selectors {
            if let Some(power) = selector.does_match(stack) {
                matched.push((power.0, i, selector));
            }
        }
    }
    matched.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal).then(a.1.cmp(&b.1)));

    let mut foreground = String::new();
    let mut background = String::new();
    let scopes: Vec<Scope> = matched
        .iter()
        .map(|(_, i, selector)| {
            let style = &theme.scopes[*i].style;
            let scope = Scope {
                name: selector_name(selector),
                foreground: hex_or_empty(style.foreground),
                background: hex_or_empty(style.background),
            };
            if !scope.foreground.is_empty() {
                foreground.clone_from(&scope.foreground);
            }
            if !scope.background.is_empty() {
                background.clone_from(&scope.background);
            }
            scope
        })
        .collect();

    CodeToken {
        content: text.to_string(),
        foreground: colors.resolve(&foreground),
        background: colors.resolve(&background),
        scopes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rust_tokenizer() -> Tokenizer {
        let mut t = Tokenizer::from_config(&ThemeConfig::default());
        assert_eq!(t.load_grammar("rs"), Some("Rust"));
        t
    }

    #[test]
    fn unknown_extension_is_plain() {
        let mut t = Tokenizer::from_config(&ThemeConfig::default());
        assert_eq!(t.load_grammar("no-such-ext"), None);
        let (line, state) = t.tokenize_line("let x = 1;", 0, None);
        assert_eq!(line, DocumentLine::plain(0, "let x = 1;"));
        assert!(state.is_none());
    }

    #[test]
    fn tokens_reassemble_line() {
        let mut t = rust_tokenizer();
        let src = "fn main() { let s = \"hi\"; } // done";
        let (line, state) = t.tokenize_line(src, 3, None);
        assert_eq!(line.index, 3);
        assert_eq!(line.text(), src);
        assert!(line.tokens.len() > 1);
        assert!(line.tokens.iter().any(|tok| tok.foreground.is_some()));
        assert!(state.is_some());
    }

    #[test]
    fn empty_line_has_one_empty_token() {
        let mut t = rust_tokenizer();
        let (line, _) = t.tokenize_line("", 0, None);
        assert_eq!(line.tokens.len(), 1);
        assert_eq!(line.text(), "");
    }

    #[test]
    fn empty_document_is_one_empty_line() {
        let mut t = Tokenizer::from_config(&ThemeConfig::default());
        let doc = t.tokenize_document("", "");
        assert_eq!(doc.lines.len(), 1);
        assert_eq!(doc.lines[0].index, 0);
        assert_eq!(doc.text(), "");
    }

    #[test]
    fn block_comment_continues_across_lines() {
        let mut t = rust_tokenizer();
        let (_, state) = t.tokenize_line("/* open", 0, None);
        let (carried, _) = t.tokenize_line("still inside", 1, state);
        let in_comment = |l: &DocumentLine| {
            l.tokens
                .iter()
                .all(|tok| tok.scopes.iter().any(|s| s.name.starts_with("comment")))
        };
        assert!(in_comment(&carried));

        let (fresh, _) = t.tokenize_line("still inside", 1, None);
        assert!(!in_comment(&fresh));
    }

    #[test]
    fn tokenize_from_matches_full_document_suffix() {
        let mut t = rust_tokenizer();
        let content = "/* a\nb */\nfn f() {}\nlet x = 2;";
        let doc = t.tokenize_document("rs", content);
        assert_eq!(doc.text(), content);

        let lines: Vec<&str> = content.lines().collect();
        let (_, states) = t.tokenize_from(&lines[..], 0, None);
        let (suffix, suffix_states) = t.tokenize_from(&lines[..], 2, states[1].clone());
        assert_eq!(suffix, doc.lines[2..].to_vec());
        assert_eq!(suffix_states.len(), 2);
        assert_eq!(suffix[0].index, 2);
    }

    #[test]
    fn gui_colors_come_from_theme_settings() {
        let mut t = Tokenizer::from_config(&ThemeConfig::default());
        assert!(t.gui_color(GuiColor::Foreground).is_some());
        assert!(t.gui_color(GuiColor::Background).is_some());
    }

    #[test]
    fn unknown_theme_name_falls_back() {
        let cfg = ThemeConfig {
            name: "no-such-theme".into(),
            path: None,
        };
        assert!(matches!(load_theme(&cfg), Err(SyntaxError::UnknownTheme(_))));
        let mut t = Tokenizer::from_config(&cfg);
        assert!(t.gui_color(GuiColor::Foreground).is_some());
    }

    #[test]
    fn missing_theme_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ThemeConfig {
            name: ThemeConfig::DEFAULT_NAME.into(),
            path: Some(dir.path().join("absent.tmTheme")),
        };
        assert!(matches!(load_theme(&cfg), Err(SyntaxError::ThemeFile { .. })));
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(24))]
            #[test]
            fn token_contents_reproduce_each_line(
                lines in proptest::collection::vec("[ -~]{0,24}", 1..6)
            ) {
                let mut t = rust_tokenizer();
                let (doc, _) = t.tokenize_from(&lines[..], 0, None);
                for (line, src) in doc.iter().zip(&lines) {
                    prop_assert_eq!(&line.text(), src);
                }
            }
        }
    }
}
