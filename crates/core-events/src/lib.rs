//! Input events fed to the editing engine, plus the cancellation token used
//! to supersede an in-flight file load.
//!
//! A [`KeyEvent`] carries both the physical key ([`KeyCode`] + [`KeyModifiers`])
//! and the text it produces (`unicode`). Mode handlers look at whichever they
//! need: sub-mode entry matches physical keys (`F` is `f` + SHIFT), motions and
//! insertion use the produced char.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub mod notation;

pub use notation::{NotationError, parse_keys};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
    /// Char produced by the key press, if any.
    pub unicode: Option<char>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Physical character key; letters are stored lowercase.
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl KeyEvent {
    /// A typed character. Uppercase letters become the lowercase key + SHIFT.
    pub fn char(c: char) -> Self {
        let (code, mods) = if c.is_uppercase() {
            let lower = c.to_lowercase().next().unwrap_or(c);
            (KeyCode::Char(lower), KeyModifiers::SHIFT)
        } else {
            (KeyCode::Char(c), KeyModifiers::empty())
        };
        Self {
            code,
            mods,
            unicode: Some(c),
        }
    }

    /// A non-printing key (Esc, Enter, ...).
    pub fn named(code: KeyCode) -> Self {
        let unicode = match code {
            KeyCode::Char(c) => Some(c),
            _ => None,
        };
        Self {
            code,
            mods: KeyModifiers::empty(),
            unicode,
        }
    }

    /// A chord such as Ctrl+V. Chords produce no text.
    pub fn chord(c: char, mods: KeyModifiers) -> Self {
        Self {
            code: KeyCode::Char(c.to_ascii_lowercase()),
            mods,
            unicode: None,
        }
    }

    pub fn ctrl(c: char) -> Self {
        Self::chord(c, KeyModifiers::CTRL)
    }

    pub fn is(&self, code: KeyCode) -> bool {
        self.code == code
    }

    /// The character this key inserts as text, if it is printable.
    pub fn printable(&self) -> Option<char> {
        if self.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) {
            return None;
        }
        self.unicode.filter(|c| !c.is_control())
    }

    /// Physical key `c` with no modifiers other than `mods`.
    pub fn matches(&self, c: char, mods: KeyModifiers) -> bool {
        self.code == KeyCode::Char(c) && self.mods == mods
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, self.unicode) {
            (_, Some(c)) if self.mods.difference(KeyModifiers::SHIFT).is_empty() => {
                write!(f, "{c}")
            }
            (code, _) => write!(f, "{:?}{:?}", code, self.mods),
        }
    }
}

/// Shared flag a caller flips to abandon an in-flight load. Clones observe
/// the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        if !self.0.swap(true, Ordering::AcqRel) {
            tracing::debug!(target: "runtime.cancel", "cancellation requested");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercase_is_shifted_lowercase_key() {
        let k = KeyEvent::char('F');
        assert_eq!(k.code, KeyCode::Char('f'));
        assert_eq!(k.mods, KeyModifiers::SHIFT);
        assert_eq!(k.printable(), Some('F'));
        assert!(k.matches('f', KeyModifiers::SHIFT));
        assert!(!k.matches('f', KeyModifiers::empty()));
    }

    #[test]
    fn chords_do_not_print() {
        let k = KeyEvent::ctrl('v');
        assert!(k.matches('v', KeyModifiers::CTRL));
        assert_eq!(k.printable(), None);
        assert_eq!(KeyEvent::named(KeyCode::Esc).printable(), None);
    }

    #[test]
    fn key_event_display() {
        assert_eq!(KeyEvent::char('x').to_string(), "x");
        let s = KeyEvent::ctrl('x').to_string();
        assert!(s.contains("Char"));
        assert!(s.contains("CTRL"));
    }

    #[test]
    fn cancel_token_shared_between_clones() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }
}
