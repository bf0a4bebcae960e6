use core_events::{KeyCode, KeyEvent};
use core_state::EngineState;
use core_text::{Motion, motion};

use super::sub_mode;
use crate::{ActionError, ActionState, ExecuteResult, execute_action, get_action};

pub(super) fn handle(
    key: &KeyEvent,
    state: &EngineState,
    action_state: &ActionState,
) -> Result<ExecuteResult, ActionError> {
    if let Some(sub) = state.sub_mode {
        return sub_mode::resolve(sub, key, state, action_state);
    }
    if let Some(sub) = sub_mode::entry(key, action_state) {
        tracing::trace!(target: "actions.dispatch", sub_mode = ?sub, "enter_sub_mode");
        return Ok(ExecuteResult::enter_sub_mode(sub, action_state.clone()));
    }

    let ch = match key.code {
        KeyCode::Left => Some('h'),
        KeyCode::Right => Some('l'),
        KeyCode::Up => Some('k'),
        KeyCode::Down => Some('j'),
        _ => key.printable(),
    };
    let Some(ch) = ch else {
        return Ok(ExecuteResult::reset());
    };

    if let Some(next) = ch.to_digit(10).and_then(|d| action_state.push_digit(d)) {
        return Ok(ExecuteResult::keep(next));
    }

    if let Some(step) = motion::lookup(ch) {
        return match motion::repeat(step, &state.lines, state.cursor, action_state.count) {
            Some(m) => apply_motion(m, state, action_state.clone()),
            None => {
                tracing::trace!(target: "actions.dispatch", key = %ch, "motion_blocked");
                Ok(ExecuteResult::reset())
            }
        };
    }

    if let Some(lookup) = get_action(ch, action_state) {
        let next = action_state.clone().with_action(lookup.action);
        if lookup.ready_to_execute {
            return execute_action(state, &next);
        }
        tracing::trace!(target: "actions.dispatch", action = ?lookup.action, "action_pending");
        return Ok(ExecuteResult::keep(next));
    }

    Ok(ExecuteResult::reset())
}

/// A resolved motion either moves the cursor or completes the pending action.
pub(super) fn apply_motion(
    m: Motion,
    state: &EngineState,
    action_state: ActionState,
) -> Result<ExecuteResult, ActionError> {
    match action_state.current_action {
        None => {
            tracing::trace!(target: "actions.dispatch", op = "motion", line = m.end.line, col = m.end.col, "cursor");
            Ok(ExecuteResult::cursor(m.end))
        }
        Some(_) => execute_action(state, &action_state.with_motion(m)),
    }
}
