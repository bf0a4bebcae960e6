//! The editing engine: one open document, driven by key events.
//!
//! `Engine` owns the authoritative [`EngineState`] for the open document plus
//! the pending Normal-mode command, the tokenizer and the observers. Shells
//! feed it file contents ([`Engine::open_file`]) and key presses
//! ([`Engine::handle_key_press`]) and read back the buffer, the cursor and the
//! tokenized [`DocumentLine`]s.
//!
//! Applying a key press
//! --------------------
//! The mode handlers in `core-actions` describe a transition as an
//! `ExecuteResult`; the engine applies it in one step:
//! * mode / sub-mode changes raise `ModeChanged`;
//! * a bare cursor move is clamped into the buffer and raises `CursorChanged`;
//! * a buffer replacement re-tokenizes from the first changed line, re-diffs
//!   every line against the text as opened, and raises `ContentChanged` or
//!   `ContentChangedAndCursorMoved`.
//!
//! Invariants (hold after every public call):
//! * `state.lines`, `state.document_lines` and the stored per-line tokenizer
//!   states have the same length, including while a load is suspended at an
//!   await point or after its future was dropped;
//! * `state.cursor` lies inside the buffer;
//! * `state.sub_mode` is `None` outside Normal mode.
//!
//! Re-tokenization reuses the tokens of every line before the first changed
//! one, resuming from that line's stored end state. Lines after an edit are
//! always re-tokenized because an edit can open or close a block comment.

use core_actions::{
    ActionError, ActionState, Clipboard, ExecuteResult, InputContext, NoClipboard, handle_key,
};
use core_config::Config;
use core_events::KeyEvent;
use core_state::{EngineState, Mode, apply_statuses, diff_lines};
use core_syntax::{Color, DocumentLine, GuiColor, LineState, Tokenizer};
use core_text::Buffer;
use tracing::{debug, warn};

mod load;
mod notify;

pub use load::{LoadError, LoadOutcome};
pub use notify::{EngineObserver, Notification};

/// Engine knobs taken from the config file.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Text inserted by `<Tab>` in Insert mode.
    pub indent: String,
    /// Debug-log load progress every N lines; 0 disables.
    pub log_every: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            log_every: 0,
        }
    }
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            indent: config.indent_unit(),
            log_every: config.file.load.log_every,
        }
    }
}

pub struct Engine {
    state: EngineState,
    action_state: ActionState,
    tokenizer: Tokenizer,
    /// Tokenizer state at the end of each line, parallel to `state.lines`.
    continuations: Vec<Option<LineState>>,
    observers: Vec<Box<dyn EngineObserver>>,
    clipboard: Box<dyn Clipboard>,
    settings: EngineSettings,
}

impl Engine {
    pub fn new(tokenizer: Tokenizer, settings: EngineSettings) -> Self {
        Self {
            state: EngineState::from_lines([""]),
            action_state: ActionState::default(),
            tokenizer,
            continuations: vec![None],
            observers: Vec::new(),
            clipboard: Box::new(NoClipboard),
            settings,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Tokenizer::from_config(&config.file.theme),
            EngineSettings::from_config(config),
        )
    }

    pub fn with_clipboard(self, clipboard: Box<dyn Clipboard>) -> Self {
        Self { clipboard, ..self }
    }

    pub fn subscribe(&mut self, observer: Box<dyn EngineObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn action_state(&self) -> &ActionState {
        &self.action_state
    }

    pub fn document(&self) -> &[DocumentLine] {
        &self.state.document_lines
    }

    /// Editor-level theme color for the shell (background, caret, ...).
    pub fn gui_color(&mut self, key: GuiColor) -> Option<Color> {
        self.tokenizer.gui_color(key)
    }

    /// Interpret one key press and apply the outcome. The returned
    /// notifications have already been delivered to the observers.
    pub fn handle_key_press(&mut self, key: KeyEvent) -> Vec<Notification> {
        debug!(target: "engine.key", key = %key, mode = ?self.state.mode, sub_mode = ?self.state.sub_mode, "key");
        let mut ctx = InputContext {
            clipboard: self.clipboard.as_mut(),
            indent: &self.settings.indent,
        };
        let outcome = handle_key(&key, &self.state, &self.action_state, &mut ctx);
        let notes = match outcome {
            Ok(Some(result)) => self.apply(result),
            Ok(None) => Vec::new(),
            Err(ActionError::NotImplemented(action)) => {
                warn!(target: "engine.key", ?action, "action_not_implemented");
                let mut notes = self.apply(ExecuteResult::reset());
                notes.push(Notification::NotImplemented(action));
                notes
            }
            Err(e) => {
                warn!(target: "engine.key", error = %e, "command_abandoned");
                self.apply(ExecuteResult::reset())
            }
        };
        self.emit(&notes);
        notes
    }

    fn apply(&mut self, result: ExecuteResult) -> Vec<Notification> {
        let mut notes = Vec::new();
        self.action_state = result.action_state.unwrap_or_default();

        let old = std::mem::take(&mut self.state);
        let mode = result.mode.unwrap_or(old.mode);
        let sub_mode = if mode == Mode::Normal { result.sub_mode } else { None };
        if mode != old.mode || sub_mode != old.sub_mode {
            notes.push(Notification::ModeChanged { mode, sub_mode });
        }
        let register = result.register.or(old.register.clone());

        match result.modification {
            Some(modification) => {
                let lines = modification.lines;
                let cursor = lines.clamp(result.new_cursor.unwrap_or(old.cursor));
                let mut document_lines = self.retokenize(&old, &lines, modification.start.line);
                let statuses = diff_lines(lines.lines(), &old.original_lines);
                apply_statuses(&mut document_lines, &statuses);
                notes.push(match result.new_cursor {
                    Some(_) => Notification::ContentChangedAndCursorMoved(cursor),
                    None => Notification::ContentChanged,
                });
                self.state = EngineState {
                    content: lines.content(),
                    lines,
                    document_lines,
                    mode,
                    sub_mode,
                    cursor,
                    register,
                    ..old
                };
            }
            None => {
                let cursor = match result.new_cursor {
                    Some(pos) => old.lines.clamp(pos),
                    None => old.cursor,
                };
                if cursor != old.cursor {
                    notes.push(Notification::CursorChanged(cursor));
                }
                self.state = EngineState {
                    mode,
                    sub_mode,
                    cursor,
                    register,
                    ..old
                };
            }
        }
        notes
    }

    /// Tokens for `lines`, reusing `old`'s tokens up to the first changed line.
    fn retokenize(&mut self, old: &EngineState, lines: &Buffer, hint: usize) -> Vec<DocumentLine> {
        let from = old
            .lines
            .first_difference(lines)
            .min(hint)
            .min(old.document_lines.len());
        let continuation = from
            .checked_sub(1)
            .and_then(|prev| self.continuations.get(prev).cloned().flatten());
        let (tail, states) = self.tokenizer.tokenize_from(lines.lines(), from, continuation);
        debug!(target: "engine.key", from, retokenized = tail.len(), reused = from, "retokenize");

        let mut document_lines: Vec<DocumentLine> = old.document_lines[..from].to_vec();
        document_lines.extend(tail);
        self.continuations.truncate(from);
        self.continuations.extend(states);
        document_lines
    }

    fn emit(&mut self, notes: &[Notification]) {
        for observer in &mut self.observers {
            for note in notes {
                observer.on_notification(note);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Position;

    fn engine_with(content: &str) -> Engine {
        let mut engine = Engine::from_config(&Config::default());
        engine.open_content("notes.txt", content);
        engine
    }

    #[test]
    fn settings_follow_config() {
        let cfg = Config::default();
        let s = EngineSettings::from_config(&cfg);
        assert_eq!(s.indent, "  ");
        assert_eq!(s.log_every, 0);
    }

    #[test]
    fn cursor_move_without_change_is_silent() {
        let mut engine = engine_with("ab");
        let notes = engine.handle_key_press(KeyEvent::char('h'));
        assert!(notes.is_empty());
        assert_eq!(engine.state().cursor, Position::origin());
    }

    #[test]
    fn lengths_stay_parallel_after_edits() {
        let mut engine = engine_with("one\ntwo");
        for key in ['i', 'x'] {
            engine.handle_key_press(KeyEvent::char(key));
        }
        engine.handle_key_press(KeyEvent::named(core_events::KeyCode::Enter));
        let s = engine.state();
        assert_eq!(s.lines.line_count(), 3);
        assert_eq!(s.document_lines.len(), 3);
        assert_eq!(engine.continuations.len(), 3);
        assert_eq!(s.content, "x\none\ntwo");
    }
}
