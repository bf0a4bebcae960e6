#![allow(dead_code)] // Shared across several integration tests; each test binary uses a subset of helpers.

use core_actions::{
    ActionError, ActionState, ExecuteResult, InputContext, MemoryClipboard, handle_key,
};
use core_events::{KeyEvent, parse_keys};
use core_state::{EngineState, Mode};
use core_text::Position;

/// Drives the handlers and applies their results the way the engine does,
/// minus tokenization and notifications.
pub struct Harness {
    pub state: EngineState,
    pub action_state: ActionState,
    pub clipboard: MemoryClipboard,
    pub indent: String,
}

impl Harness {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            state: EngineState::from_lines(lines.iter().copied()),
            action_state: ActionState::default(),
            clipboard: MemoryClipboard::default(),
            indent: "  ".to_string(),
        }
    }

    pub fn at(self, line: usize, col: usize) -> Self {
        Self {
            state: self.state.with_cursor(line, col),
            ..self
        }
    }

    pub fn in_insert(self) -> Self {
        Self {
            state: self.state.with_mode(Mode::Insert),
            ..self
        }
    }

    pub fn press(&mut self, key: KeyEvent) -> Result<Option<ExecuteResult>, ActionError> {
        let mut ctx = InputContext {
            clipboard: &mut self.clipboard,
            indent: &self.indent,
        };
        let outcome = handle_key(&key, &self.state, &self.action_state, &mut ctx);
        match &outcome {
            Ok(Some(r)) => self.apply(r.clone()),
            Ok(None) => {}
            Err(_) => self.action_state = ActionState::default(),
        }
        outcome
    }

    /// Press every key of a notation string, panicking on handler errors.
    pub fn keys(&mut self, notation: &str) {
        for key in parse_keys(notation).expect("valid key notation") {
            self.press(key).expect("handler error");
        }
    }

    fn apply(&mut self, r: ExecuteResult) {
        self.action_state = r.action_state.unwrap_or_default();
        let mode = r.mode.unwrap_or(self.state.mode);
        if let Some(m) = r.modification {
            self.state.lines = m.lines;
        }
        let cursor = r.new_cursor.unwrap_or(self.state.cursor);
        self.state.cursor = self.state.lines.clamp(cursor);
        self.state.mode = mode;
        self.state.sub_mode = if mode == Mode::Normal { r.sub_mode } else { None };
        if r.register.is_some() {
            self.state.register = r.register;
        }
    }

    pub fn lines(&self) -> Vec<&str> {
        self.state.lines.lines().iter().map(String::as_str).collect()
    }

    pub fn cursor(&self) -> Position {
        self.state.cursor
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }
}
