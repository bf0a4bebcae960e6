//! RGBA colors and the hex-string cache used while styling tokens.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => {
                let nib = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
                Some(Self::rgb(nib(0)?, nib(1)?, nib(2)?))
            }
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: byte(6)?,
            }),
            _ => None,
        }
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(self) -> String {
        if self.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<syntect::highlighting::Color> for Color {
    fn from(c: syntect::highlighting::Color) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Memoizes hex string -> color conversions. Themes reuse a handful of
/// colors across thousands of tokens.
#[derive(Debug, Default)]
pub struct ColorCache {
    entries: HashMap<String, Option<Color>>,
}

impl ColorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` for the empty string or an unparsable value.
    pub fn resolve(&mut self, hex: &str) -> Option<Color> {
        if hex.is_empty() {
            return None;
        }
        if let Some(hit) = self.entries.get(hex) {
            return *hit;
        }
        let parsed = Color::parse_hex(hex);
        self.entries.insert(hex.to_string(), parsed);
        parsed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_forms() {
        assert_eq!(Color::parse_hex("#fff"), Some(Color::rgb(255, 255, 255)));
        assert_eq!(Color::parse_hex("#1e1e2e"), Some(Color::rgb(0x1e, 0x1e, 0x2e)));
        assert_eq!(
            Color::parse_hex("cdd6f480"),
            Some(Color {
                r: 0xcd,
                g: 0xd6,
                b: 0xf4,
                a: 0x80
            })
        );
        assert_eq!(Color::parse_hex("#12345"), None);
        assert_eq!(Color::parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn hex_omits_opaque_alpha() {
        assert_eq!(Color::rgb(1, 2, 255).to_hex(), "#0102ff");
        let c = Color { a: 0x10, ..Color::rgb(1, 2, 3) };
        assert_eq!(c.to_hex(), "#01020310");
    }

    #[test]
    fn cache_memoizes_including_failures() {
        let mut cache = ColorCache::new();
        assert_eq!(cache.resolve(""), None);
        assert!(cache.is_empty());
        assert_eq!(cache.resolve("#000000"), Some(Color::rgb(0, 0, 0)));
        assert_eq!(cache.resolve("#000000"), Some(Color::rgb(0, 0, 0)));
        assert_eq!(cache.resolve("bogus"), None);
        assert_eq!(cache.len(), 2);
    }
}
