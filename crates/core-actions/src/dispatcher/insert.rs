use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_state::EngineState;

use super::InputContext;
use crate::ExecuteResult;

pub(super) fn handle(
    key: &KeyEvent,
    state: &EngineState,
    ctx: &mut InputContext<'_>,
) -> Option<ExecuteResult> {
    if key.matches('v', KeyModifiers::CTRL) {
        return paste(state, ctx);
    }
    let at = state.cursor;
    let mut lines = state.lines.clone();
    let (op, cursor) = match key.code {
        KeyCode::Enter => ("insert_newline", lines.split_line(at)),
        KeyCode::Backspace => ("backspace", lines.delete_char_before(at)?),
        KeyCode::Tab => ("insert_indent", lines.insert_str(at, ctx.indent)),
        _ => {
            let ch = key.printable()?;
            let mut utf8 = [0u8; 4];
            ("insert_char", lines.insert_str(at, ch.encode_utf8(&mut utf8)))
        }
    };
    tracing::trace!(target: "actions.dispatch", op, line = at.line, col = at.col, to_line = cursor.line, to_col = cursor.col, "edit");
    let start = at.min(cursor);
    Some(ExecuteResult::edit(lines, start, Some(cursor)))
}

fn paste(state: &EngineState, ctx: &mut InputContext<'_>) -> Option<ExecuteResult> {
    let text = ctx.clipboard.text().filter(|t| !t.is_empty())?;
    let mut lines = state.lines.clone();
    let cursor = lines.insert_text(state.cursor, &text);
    tracing::trace!(target: "actions.dispatch", op = "paste", line = state.cursor.line, len = text.len(), to_line = cursor.line, to_col = cursor.col, "edit");
    Some(ExecuteResult::edit(lines, state.cursor, Some(cursor)))
}
