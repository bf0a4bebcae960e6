use core_state::{Mode, SubMode};
use core_text::{Buffer, Position};

use crate::ActionState;

/// Replacement buffer produced by an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modification {
    pub lines: Buffer,
    /// Where the edit happened; nothing before this line changed.
    pub start: Position,
}

/// What one key press should do. Every field is optional: `None` means
/// "leave as is", except `sub_mode` (the sub-mode after this key, `None`
/// clears it) and `action_state` (`None` resets it).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteResult {
    pub new_cursor: Option<Position>,
    pub mode: Option<Mode>,
    pub sub_mode: Option<SubMode>,
    pub modification: Option<Modification>,
    pub action_state: Option<ActionState>,
    /// Text to store in the register.
    pub register: Option<String>,
}

impl ExecuteResult {
    /// Abandon whatever was pending.
    pub fn reset() -> Self {
        Self::default()
    }

    pub fn cursor(pos: Position) -> Self {
        Self {
            new_cursor: Some(pos),
            ..Self::default()
        }
    }

    /// Keep waiting for more keys with `state`.
    pub fn keep(state: ActionState) -> Self {
        Self {
            action_state: Some(state),
            ..Self::default()
        }
    }

    pub fn enter_sub_mode(sub_mode: SubMode, state: ActionState) -> Self {
        Self {
            sub_mode: Some(sub_mode),
            action_state: Some(state),
            ..Self::default()
        }
    }

    pub fn escape() -> Self {
        Self {
            mode: Some(Mode::Normal),
            ..Self::default()
        }
    }

    pub fn edit(lines: Buffer, start: Position, cursor: Option<Position>) -> Self {
        Self {
            new_cursor: cursor,
            modification: Some(Modification { lines, start }),
            ..Self::default()
        }
    }
}
