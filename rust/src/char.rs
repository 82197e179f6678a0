use lazy_static::lazy_static;
use std::ops::RangeInclusive;

#[derive(Clone)]
pub struct CharFilter {
    table: [bool; 256],
}

impl CharFilter {
    pub fn new() -> CharFilter {
        CharFilter {
            table: [false; 256],
        }
    }

    pub fn add_char(&mut self, c: u8) {
        self.table[c as usize] = true;
    }

    pub fn add_chars(&mut self, chars: RangeInclusive<u8>) {
        for c in chars {
            self.table[c as usize] = true;
        }
    }

    pub fn add_chars_from_slice(&mut self, chars: &[u8]) {
        for c in chars {
            self.table[*c as usize] = true;
        }
    }

    pub fn has(&self, c: u8) -> bool {
        self.table[c as usize]
    }
}

/// Strings are Rust strings, so a lone UTF-16 surrogate `\uXXXX` is stored as the character
/// `LONE_SURROGATE_BASE + (XXXX - 0xD800)` and printed back as an escape. Source characters in
/// that range are rejected.
pub const LONE_SURROGATE_BASE: u32 = 0x10F800;

pub fn lone_surrogate_to_char(unit: u32) -> Option<char> {
    match unit {
        0xD800..=0xDFFF => char::from_u32(LONE_SURROGATE_BASE + (unit - 0xD800)),
        _ => None,
    }
}

pub fn char_to_lone_surrogate(c: char) -> Option<u32> {
    let c = c as u32;
    (c >= LONE_SURROGATE_BASE).then(|| c - LONE_SURROGATE_BASE + 0xD800)
}

// WARNING: Does not consider Unicode characters allowed by ECMAScript.
pub const ID_START_CHARSTR: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_$";
pub const DIGIT_CHARSTR: &[u8] = b"0123456789";

lazy_static! {
    pub static ref DIGIT: CharFilter = {
        let mut filter = CharFilter::new();
        filter.add_chars(b'0'..=b'9');
        filter
    };

    // Digits plus the `_` numeric separator.
    pub static ref DIGIT_SEP: CharFilter = {
        let mut filter = DIGIT.clone();
        filter.add_char(b'_');
        filter
    };

    pub static ref DIGIT_BIN: CharFilter = {
        let mut filter = CharFilter::new();
        filter.add_chars(b'0'..=b'1');
        filter.add_char(b'_');
        filter
    };

    pub static ref DIGIT_HEX: CharFilter = {
        let mut filter = CharFilter::new();
        filter.add_chars(b'0'..=b'9');
        filter.add_chars(b'a'..=b'f');
        filter.add_chars(b'A'..=b'F');
        filter.add_char(b'_');
        filter
    };

    pub static ref DIGIT_OCT: CharFilter = {
        let mut filter = CharFilter::new();
        filter.add_chars(b'0'..=b'7');
        filter.add_char(b'_');
        filter
    };

    pub static ref ID_START: CharFilter = {
        let mut filter = CharFilter::new();
        filter.add_chars_from_slice(ID_START_CHARSTR);
        filter
    };

    pub static ref ID_CONTINUE: CharFilter = {
        let mut filter = ID_START.clone();
        // WARNING: Does not consider Unicode characters allowed by ECMAScript.
        filter.add_chars(b'0'..=b'9');
        filter
    };

    pub static ref WHITESPACE: CharFilter = {
        let mut filter = CharFilter::new();
        // WARNING: Does not consider Unicode whitespace allowed by ECMAScript.
        // Horizontal tab.
        filter.add_char(b'\x09');
        // Line feed.
        filter.add_char(b'\x0a');
        // Vertical tab.
        filter.add_char(b'\x0b');
        // Form feed.
        filter.add_char(b'\x0c');
        // Carriage return.
        filter.add_char(b'\x0d');
        // Space.
        filter.add_char(b'\x20');
        filter
    };
}

/// Whether `c` could continue an identifier, treating any non-ASCII byte as part of a Unicode
/// identifier character.
pub fn is_identifier_byte(c: u8) -> bool {
    !c.is_ascii() || ID_CONTINUE.has(c)
}

/// Whether `name` is an ASCII IdentifierName. Reserved words are IdentifierNames too, which is
/// what property access and object keys accept.
pub fn is_identifier_name(name: &[u8]) -> bool {
    match name.split_first() {
        Some((first, rest)) => ID_START.has(*first) && rest.iter().all(|c| ID_CONTINUE.has(*c)),
        None => false,
    }
}
