//! Operators (`c`, `y`, ...) and the pending-command state they accumulate.

use core_state::{EngineState, Mode};
use core_text::text_object::Extent;
use core_text::{Motion, Position};
use thiserror::Error;

use crate::ExecuteResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Change,
    Go,
    Yank,
    Paste,
    Replace,
    Insert,
    Append,
}

/// Key, action, and whether it runs without waiting for a motion.
const ACTIONS: &[(char, Action, bool)] = &[
    ('c', Action::Change, false),
    ('g', Action::Go, false),
    ('y', Action::Yank, false),
    ('p', Action::Paste, false),
    ('r', Action::Replace, false),
    ('i', Action::Insert, true),
    ('a', Action::Append, true),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("{0:?} is not implemented")]
    NotImplemented(Action),
    #[error("no action pending")]
    NothingPending,
}

/// A partially typed Normal-mode command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionState {
    pub count: usize,
    pub current_action: Option<Action>,
    pub modifier: Option<Extent>,
    pub motion: Option<Motion>,
    pub(crate) count_typed: bool,
}

impl Default for ActionState {
    fn default() -> Self {
        Self {
            count: 1,
            current_action: None,
            modifier: None,
            motion: None,
            count_typed: false,
        }
    }
}

impl ActionState {
    /// Add a typed digit to the count. A leading `0` is not a count (it is
    /// the line-start motion), so it yields `None`.
    pub fn push_digit(&self, digit: u32) -> Option<Self> {
        if digit == 0 && !self.count_typed {
            return None;
        }
        let base = if self.count_typed { self.count } else { 0 };
        Some(Self {
            count: base.saturating_mul(10).saturating_add(digit as usize),
            count_typed: true,
            ..self.clone()
        })
    }

    pub fn with_action(self, action: Action) -> Self {
        Self {
            current_action: Some(action),
            ..self
        }
    }

    pub fn with_motion(self, motion: Motion) -> Self {
        Self {
            motion: Some(motion),
            ..self
        }
    }

    pub fn with_modifier(self, modifier: Extent) -> Self {
        Self {
            modifier: Some(modifier),
            ..self
        }
    }

    /// True once anything beyond the defaults has been typed.
    pub fn is_pending(&self) -> bool {
        self.count_typed || self.current_action.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionLookup {
    pub action: Action,
    pub ready_to_execute: bool,
}

/// Action bound to `key`. It is ready when it needs no motion or `state`
/// already holds one.
pub fn get_action(key: char, state: &ActionState) -> Option<ActionLookup> {
    let (_, action, immediate) = ACTIONS.iter().find(|(k, _, _)| *k == key)?;
    Some(ActionLookup {
        action: *action,
        ready_to_execute: *immediate || state.motion.is_some(),
    })
}

/// Run the pending action against `engine`.
///
/// # Panics
/// When the action needs a motion (`Change`, `Yank`) and `state.motion` is
/// `None`. Callers only execute those once a motion has been attached.
pub fn execute_action(
    engine: &EngineState,
    state: &ActionState,
) -> Result<ExecuteResult, ActionError> {
    let action = state.current_action.ok_or(ActionError::NothingPending)?;
    let cursor = engine.cursor;
    let result = match action {
        Action::Change => {
            let (start, end) = required_motion(action, state).span();
            let mut lines = engine.lines.clone();
            let removed = lines.delete_between(start, end);
            let start = lines.clamp(start);
            tracing::trace!(target: "actions.dispatch", op = "change", line = start.line, col = start.col, removed = removed.chars().count(), "edit");
            ExecuteResult {
                mode: Some(Mode::Insert),
                ..ExecuteResult::edit(lines, start, Some(start))
            }
        }
        Action::Yank => {
            let (start, end) = required_motion(action, state).span();
            let text = engine.lines.text_between(start, end);
            tracing::trace!(target: "actions.dispatch", op = "yank", line = start.line, col = start.col, len = text.chars().count(), "register");
            ExecuteResult {
                register: Some(text),
                ..ExecuteResult::cursor(engine.lines.clamp(start))
            }
        }
        Action::Append => {
            let len = engine.lines.line_len(cursor.line);
            ExecuteResult {
                mode: Some(Mode::Insert),
                ..ExecuteResult::cursor(Position::new(cursor.line, (cursor.col + 1).min(len)))
            }
        }
        Action::Insert => ExecuteResult {
            mode: Some(Mode::Insert),
            ..ExecuteResult::default()
        },
        Action::Go | Action::Paste | Action::Replace => {
            return Err(ActionError::NotImplemented(action));
        }
    };
    Ok(result)
}

fn required_motion(action: Action, state: &ActionState) -> Motion {
    let Some(motion) = state.motion else {
        panic!("{action:?} executed without a motion");
    };
    motion
}
