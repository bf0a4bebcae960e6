mod common;

use common::Harness;
use core_actions::{Action, ActionError, ActionState, ExecuteResult};
use core_events::{KeyCode, KeyEvent, parse_keys};
use core_state::Mode;
use core_text::Position;
use pretty_assertions::assert_eq;

#[test]
fn l_clamps_one_past_last_char() {
    let mut h = Harness::new(&["abc", "def"]);
    for col in [1, 2, 3, 3] {
        h.keys("l");
        assert_eq!(h.cursor(), Position::new(0, col));
    }
}

#[test]
fn huge_count_on_a_blocked_motion_returns_promptly() {
    let mut h = Harness::new(&["abc"]);
    h.keys("99999999999j");
    assert_eq!(h.cursor(), Position::origin());
    h.keys("99999999999999999999999l");
    assert_eq!(h.cursor(), Position::new(0, 3));
    assert_eq!(h.action_state, ActionState::default());
}

#[test]
fn counts_repeat_motions() {
    let mut h = Harness::new(&["one two three four"]);
    h.keys("2w");
    assert_eq!(h.cursor(), Position::new(0, 8));
    h.keys("0");
    assert_eq!(h.cursor(), Position::origin());
    h.keys("10l");
    assert_eq!(h.cursor(), Position::new(0, 10));
    assert_eq!(h.action_state, ActionState::default());
}

#[test]
fn line_motions() {
    let mut h = Harness::new(&["  indented", "x", "last line"]).at(0, 6);
    h.keys("^");
    assert_eq!(h.cursor(), Position::new(0, 2));
    h.keys("$");
    assert_eq!(h.cursor(), Position::new(0, 9));
    h.keys("G");
    assert_eq!(h.cursor(), Position::new(2, 9));
    h.keys("gg");
    assert_eq!(h.cursor(), Position::origin());
}

#[test]
fn arrow_keys_move_like_hjkl() {
    let mut h = Harness::new(&["ab", "cd"]);
    h.press(KeyEvent::named(KeyCode::Down)).unwrap();
    h.press(KeyEvent::named(KeyCode::Right)).unwrap();
    assert_eq!(h.cursor(), Position::new(1, 1));
}

#[test]
fn change_one_char() {
    let mut h = Harness::new(&["hello"]).at(0, 2);
    h.keys("cl");
    assert_eq!(h.lines(), vec!["helo"]);
    assert_eq!(h.mode(), Mode::Insert);
    assert_eq!(h.cursor(), Position::new(0, 2));
}

#[test]
fn change_word_then_type() {
    let mut h = Harness::new(&["foo bar"]);
    h.keys("cwbaz <Esc>");
    assert_eq!(h.lines(), vec!["baz bar"]);
    assert_eq!(h.mode(), Mode::Normal);
}

#[test]
fn change_with_count() {
    let mut h = Harness::new(&["a b c d"]);
    h.keys("c2w");
    assert_eq!(h.lines(), vec!["c d"]);
}

#[test]
fn blocked_motion_abandons_action() {
    let mut h = Harness::new(&["foo"]);
    let r = h.press(parse_keys("c").unwrap()[0]).unwrap().unwrap();
    assert_eq!(r.action_state.unwrap().current_action, Some(Action::Change));
    h.keys("b");
    assert_eq!(h.lines(), vec!["foo"]);
    assert_eq!(h.mode(), Mode::Normal);
    assert_eq!(h.action_state, ActionState::default());
}

#[test]
fn unknown_key_resets_pending() {
    let mut h = Harness::new(&["foo"]);
    h.keys("3cz");
    assert_eq!(h.action_state, ActionState::default());
    h.keys("l");
    assert_eq!(h.lines(), vec!["foo"]);
    assert_eq!(h.cursor(), Position::new(0, 1));
}

#[test]
fn insert_and_append_enter_insert_mode() {
    let mut h = Harness::new(&["ab"]).at(0, 1);
    h.keys("i");
    assert_eq!((h.mode(), h.cursor()), (Mode::Insert, Position::new(0, 1)));
    h.keys("<Esc>a");
    assert_eq!((h.mode(), h.cursor()), (Mode::Insert, Position::new(0, 2)));
}

#[test]
fn yank_word_into_register() {
    let mut h = Harness::new(&["foo bar"]).at(0, 4);
    h.keys("ye");
    assert_eq!(h.state.register.as_deref(), Some("ba"));
    h.keys("0yw");
    assert_eq!(h.state.register.as_deref(), Some("foo "));
    assert_eq!(h.lines(), vec!["foo bar"]);
    assert_eq!(h.mode(), Mode::Normal);
}

#[test]
fn paste_action_is_not_implemented() {
    let mut h = Harness::new(&["foo bar"]);
    h.keys("p");
    let outcome = h.press(KeyEvent::char('w'));
    assert_eq!(outcome, Err(ActionError::NotImplemented(Action::Paste)));
    assert_eq!(h.action_state, ActionState::default());
}

#[test]
fn escape_in_normal_changes_nothing() {
    let mut h = Harness::new(&["abc"]).at(0, 1);
    let before = (h.lines().join("\n"), h.cursor(), h.mode());
    let r = h.press(KeyEvent::named(KeyCode::Esc)).unwrap();
    assert_eq!(r, Some(ExecuteResult::escape()));
    assert_eq!((h.lines().join("\n"), h.cursor(), h.mode()), before);
    assert_eq!(h.state.sub_mode, None);
}
