use core_events::{KeyEvent, KeyModifiers};
use core_state::{EngineState, SubMode};
use core_text::text_object::{self, Extent};
use core_text::motion;

use super::normal::apply_motion;
use crate::{ActionError, ActionState, ExecuteResult};

/// Key, exact modifiers, whether an action must be pending, sub-mode entered.
const ENTRIES: &[(char, KeyModifiers, bool, SubMode)] = &[
    ('i', KeyModifiers::empty(), true, SubMode::TextObjectInside),
    ('a', KeyModifiers::empty(), true, SubMode::TextObjectAround),
    ('s', KeyModifiers::empty(), true, SubMode::TextObjectSurround),
    ('g', KeyModifiers::empty(), false, SubMode::Go),
    ('f', KeyModifiers::empty(), false, SubMode::FindForward),
    ('f', KeyModifiers::SHIFT, false, SubMode::FindBackward),
    ('r', KeyModifiers::empty(), false, SubMode::ReplaceChar),
];

/// Sub-mode opened by `key`, if any.
pub(super) fn entry(key: &KeyEvent, action_state: &ActionState) -> Option<SubMode> {
    let pending = action_state.current_action.is_some();
    ENTRIES
        .iter()
        .find(|(c, mods, needs_action, _)| key.matches(*c, *mods) && (pending || !needs_action))
        .map(|(_, _, _, sub)| *sub)
}

/// Second key of a two-key command. The sub-mode ends here whatever happens.
pub(super) fn resolve(
    sub: SubMode,
    key: &KeyEvent,
    state: &EngineState,
    action_state: &ActionState,
) -> Result<ExecuteResult, ActionError> {
    let Some(ch) = key.printable() else {
        return Ok(ExecuteResult::reset());
    };
    let (buf, cursor, count) = (&state.lines, state.cursor, action_state.count);
    let mut next = action_state.clone();
    let resolved = match sub {
        SubMode::Go => motion::go(ch, buf, cursor),
        SubMode::FindForward => {
            motion::repeat(|b, c| motion::find_forward(ch, b, c), buf, cursor, count)
        }
        SubMode::FindBackward => {
            motion::repeat(|b, c| motion::find_backward(ch, b, c), buf, cursor, count)
        }
        SubMode::TextObjectInside => {
            next = next.with_modifier(Extent::Inner);
            text_object::resolve(ch, Extent::Inner, buf, cursor)
        }
        SubMode::TextObjectAround => {
            next = next.with_modifier(Extent::Around);
            text_object::resolve(ch, Extent::Around, buf, cursor)
        }
        SubMode::TextObjectSurround => None,
        SubMode::ReplaceChar => return Ok(replace_char(ch, state)),
    };
    match resolved {
        Some(m) => apply_motion(m, state, next),
        None => {
            tracing::trace!(target: "actions.dispatch", sub_mode = ?sub, key = %ch, "sub_mode_unresolved");
            Ok(ExecuteResult::reset())
        }
    }
}

/// `r{c}`: overwrite the char under the cursor; cursor stays.
fn replace_char(ch: char, state: &EngineState) -> ExecuteResult {
    let mut lines = state.lines.clone();
    if !lines.replace_char(state.cursor, ch) {
        return ExecuteResult::reset();
    }
    tracing::trace!(target: "actions.dispatch", op = "replace_char", line = state.cursor.line, col = state.cursor.col, "edit");
    ExecuteResult::edit(lines, state.cursor, None)
}
