use std::{fmt::Debug, hash::Hash};

use crate::header::{CLOSE, END, OPEN, SEP};

const ESCAPE: char = '\\';

/// A value that can be counted, placed in a code tree and written as a leaf
/// label of the tree header.
///
/// Labels must never contain one of the header control bytes, and must
/// survive `parse_label(write_label(x)) == x`.
pub trait Symbol: Clone + Eq + Hash + Debug {
    fn write_label(&self, out: &mut String);

    fn parse_label(label: &str) -> Option<Self>;
}

fn is_reserved(c: char) -> bool {
    c == ESCAPE || u8::try_from(c).map_or(false, |b| [END, OPEN, SEP, CLOSE].contains(&b))
}

impl Symbol for char {
    fn write_label(&self, out: &mut String) {
        if is_reserved(*self) {
            out.push(ESCAPE);
            out.push_str(&format!("{:02x}", *self as u32));
        } else {
            out.push(*self);
        }
    }

    fn parse_label(label: &str) -> Option<Self> {
        let mut chars = label.chars();
        match (chars.next(), chars.next()) {
            (Some(ESCAPE), Some(_)) if label.len() == 3 => {
                let code = u8::from_str_radix(&label[1..], 16).ok()?;
                let c = code as char;
                is_reserved(c).then_some(c)
            }
            (Some(c), None) if !is_reserved(c) => Some(c),
            _ => None,
        }
    }
}

impl Symbol for u8 {
    fn write_label(&self, out: &mut String) {
        out.push_str(&self.to_string());
    }

    fn parse_label(label: &str) -> Option<Self> {
        label.parse().ok()
    }
}

/// Pixel colors, packed as `0xAARRGGBB`.
impl Symbol for u32 {
    fn write_label(&self, out: &mut String) {
        out.push_str(&self.to_string());
    }

    fn parse_label(label: &str) -> Option<Self> {
        label.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::Symbol;

    fn label<S: Symbol>(symbol: S) -> String {
        let mut out = String::new();
        symbol.write_label(&mut out);
        out
    }

    #[test]
    fn plain_chars_are_literal() {
        assert_eq!(label('a'), "a");
        assert_eq!(label(':'), ":");
        assert_eq!(label('é'), "é");
        assert_eq!(char::parse_label("é"), Some('é'));
        assert_eq!(char::parse_label(":"), Some(':'));
    }

    #[test]
    fn control_chars_are_escaped() {
        assert_eq!(label('\u{1c}'), "\\1c");
        assert_eq!(label('\u{1f}'), "\\1f");
        assert_eq!(label('\\'), "\\5c");
        assert_eq!(char::parse_label("\\1d"), Some('\u{1d}'));
        assert_eq!(char::parse_label("\\5c"), Some('\\'));
    }

    #[test]
    fn invalid_char_labels() {
        assert_eq!(char::parse_label(""), None);
        assert_eq!(char::parse_label("ab"), None);
        assert_eq!(char::parse_label("\\41"), None);
        assert_eq!(char::parse_label("\\zz"), None);
        assert_eq!(char::parse_label("\u{1e}"), None);
    }

    #[test]
    fn numeric_labels() {
        assert_eq!(label(200u8), "200");
        assert_eq!(u8::parse_label("255"), Some(255));
        assert_eq!(u8::parse_label("256"), None);
        assert_eq!(label(0xFF00FF00u32), "4278255360");
        assert_eq!(u32::parse_label("4278255360"), Some(0xFF00FF00));
        assert_eq!(u32::parse_label("-1"), None);
    }
}
