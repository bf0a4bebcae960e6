//! Vim-style key notation: `ciw<Esc>`, `<C-v>`, `i<CR>`.
//!
//! Plain characters stand for themselves. `<...>` names a special key or a
//! chord; a `<` that does not start a valid `<...>` group is taken literally.

use thiserror::Error;

use crate::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("unknown key name <{0}>")]
    UnknownKey(String),
}

pub fn parse_keys(input: &str) -> Result<Vec<KeyEvent>, NotationError> {
    let mut keys = Vec::new();
    let mut rest = input;
    while let Some(c) = rest.chars().next() {
        if c == '<'
            && let Some(close) = rest.find('>')
            && close > 1
            && !rest[1..close].contains('<')
        {
            keys.push(parse_group(&rest[1..close])?);
            rest = &rest[close + 1..];
            continue;
        }
        keys.push(KeyEvent::char(c));
        rest = &rest[c.len_utf8()..];
    }
    Ok(keys)
}

fn parse_group(name: &str) -> Result<KeyEvent, NotationError> {
    let unknown = || NotationError::UnknownKey(name.to_string());
    if let Some((prefix, key)) = name.split_once('-') {
        let mods = match prefix.to_ascii_uppercase().as_str() {
            "C" => KeyModifiers::CTRL,
            "A" | "M" => KeyModifiers::ALT,
            "S" => KeyModifiers::SHIFT,
            _ => return Err(unknown()),
        };
        let mut chars = key.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(KeyEvent::chord(c, mods)),
            _ => Err(unknown()),
        };
    }
    let key = match name.to_ascii_lowercase().as_str() {
        "esc" => KeyEvent::named(KeyCode::Esc),
        "cr" | "enter" | "return" => KeyEvent::named(KeyCode::Enter),
        "bs" | "backspace" => KeyEvent::named(KeyCode::Backspace),
        "tab" => KeyEvent::named(KeyCode::Tab),
        "up" => KeyEvent::named(KeyCode::Up),
        "down" => KeyEvent::named(KeyCode::Down),
        "left" => KeyEvent::named(KeyCode::Left),
        "right" => KeyEvent::named(KeyCode::Right),
        "space" => KeyEvent::char(' '),
        "lt" => KeyEvent::char('<'),
        "gt" => KeyEvent::char('>'),
        _ => return Err(unknown()),
    };
    Ok(key)
}
