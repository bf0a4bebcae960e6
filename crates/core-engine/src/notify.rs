//! Notifications raised by the engine and the observer hook that receives them.

use core_actions::Action;
use core_state::{Mode, SubMode};
use core_syntax::DocumentLine;
use core_text::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A line finished tokenizing during a file load.
    LineParsed(DocumentLine),
    /// The load completed; `line_count` lines are in the buffer.
    FinishedParsing { line_count: usize },
    ModeChanged {
        mode: Mode,
        sub_mode: Option<SubMode>,
    },
    /// Cursor moved without a buffer change.
    CursorChanged(Position),
    /// Buffer changed; cursor stayed where it was.
    ContentChanged,
    ContentChangedAndCursorMoved(Position),
    /// A recognised command has no implementation; nothing was done.
    NotImplemented(Action),
}

/// Receives every notification synchronously, in order, on the thread that
/// drives the engine.
pub trait EngineObserver: Send {
    fn on_notification(&mut self, note: &Notification);
}

impl<F> EngineObserver for F
where
    F: FnMut(&Notification) + Send,
{
    fn on_notification(&mut self, note: &Notification) {
        self(note)
    }
}
