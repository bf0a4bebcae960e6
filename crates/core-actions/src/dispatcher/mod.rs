//! Routes a key event to the handler for the current mode.
//!
//! * `normal`   - counts, motions, operators
//! * `sub_mode` - second key of `g`, `f`, `F`, `r`, and text objects
//! * `insert`   - text entry, line split/join, paste
//!
//! Escape is handled here for every mode: back to Normal, sub-mode cleared,
//! pending command dropped.

use core_events::{KeyCode, KeyEvent};
use core_state::{EngineState, Mode};

use crate::{ActionError, ActionState, Clipboard, ExecuteResult};

mod insert;
mod normal;
mod sub_mode;

/// Collaborators a handler may consult besides the engine state.
pub struct InputContext<'a> {
    pub clipboard: &'a mut dyn Clipboard,
    /// Text inserted by `<Tab>`.
    pub indent: &'a str,
}

/// Interpret one key. `Ok(None)` means the key does nothing in this state.
pub fn handle_key(
    key: &KeyEvent,
    state: &EngineState,
    action_state: &ActionState,
    ctx: &mut InputContext<'_>,
) -> Result<Option<ExecuteResult>, ActionError> {
    if key.is(KeyCode::Esc) {
        tracing::trace!(target: "actions.dispatch", from = ?state.mode, "escape");
        return Ok(Some(ExecuteResult::escape()));
    }
    match state.mode {
        Mode::Normal => normal::handle(key, state, action_state).map(Some),
        Mode::Insert => Ok(insert::handle(key, state, ctx)),
        Mode::Visual => Ok(None),
    }
}
