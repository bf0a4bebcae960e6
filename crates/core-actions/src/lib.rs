//! Key interpretation: turns key events into cursor moves, mode changes and
//! buffer edits.
//!
//! Handlers never mutate engine state. They read the current [`EngineState`]
//! and [`ActionState`] and describe what should happen as an
//! [`ExecuteResult`]; the engine applies it.
//!
//! [`EngineState`]: core_state::EngineState

pub mod action;
pub mod clipboard;
pub mod dispatcher;
mod result;

pub use action::{Action, ActionError, ActionLookup, ActionState, execute_action, get_action};
pub use clipboard::{Clipboard, MemoryClipboard, NoClipboard};
pub use dispatcher::{InputContext, handle_key};
pub use result::{ExecuteResult, Modification};
