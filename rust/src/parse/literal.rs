use crate::ast::ClassOrObjectMemberKey;
use crate::char::{char_to_lone_surrogate, lone_surrogate_to_char, LONE_SURROGATE_BASE};
use crate::error::{SyntaxError, SyntaxErrorType, SyntaxResult};
use crate::num::JsNumber;
use crate::parse::expr::parse_expr;
use crate::parse::parser::Parser;
use crate::source::SourceRange;
use crate::token::TokenType;

fn parse_radix(digits: &str, radix: u32) -> f64 {
    // Accumulate in f64 so values past u64 round like the JS parser does.
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * radix as f64 + d as f64)
}

pub fn normalise_literal_number(raw: &SourceRange) -> SyntaxResult<JsNumber> {
    let text: String = raw.as_str().chars().filter(|c| *c != '_').collect();
    let value = match text.as_bytes() {
        [b'0', b'b' | b'B', ..] => parse_radix(&text[2..], 2),
        [b'0', b'o' | b'O', ..] => parse_radix(&text[2..], 8),
        [b'0', b'x' | b'X', ..] => parse_radix(&text[2..], 16),
        // Legacy octal like `0777`. Something like `089` is decimal.
        [b'0', rest @ ..]
            if !rest.is_empty() && rest.iter().all(|c| (b'0'..=b'7').contains(c)) =>
        {
            parse_radix(&text[1..], 8)
        }
        _ => text.parse::<f64>().map_err(|_| {
            SyntaxError::from_loc(
                raw,
                SyntaxErrorType::MalformedLiteralNumber,
                Some(TokenType::LiteralNumber),
            )
        })?,
    };
    Ok(JsNumber(value))
}

pub fn normalise_literal_bigint(raw: &SourceRange) -> String {
    raw.as_str().chars().filter(|c| *c != '_').collect()
}

// Reads up to `max` hex digits, or exactly `max` when `exact`.
fn read_hex(chars: &[char], i: &mut usize, max: usize, exact: bool) -> Option<u32> {
    let mut value = 0u32;
    let mut n = 0;
    while n < max {
        match chars.get(*i).and_then(|c| c.to_digit(16)) {
            Some(d) => {
                value = value.checked_mul(16)?.checked_add(d)?;
                *i += 1;
                n += 1;
            }
            None => break,
        };
    }
    if n == 0 || (exact && n != max) {
        None
    } else {
        Some(value)
    }
}

/// Decodes the escapes in the body of a string literal or template, yielding the string value.
/// UTF-16 surrogate pairs written as two `\u` escapes are combined; a lone surrogate cannot be
/// represented in a Rust string and is rejected.
pub fn decode_escapes(raw: &SourceRange, body: &str) -> SyntaxResult<String> {
    let err = |typ| SyntaxError::from_loc(raw, typ, Some(TokenType::LiteralString));
    let chars: Vec<char> = body.chars().collect();
    let mut out = String::with_capacity(body.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c != '\\' {
            // Line terminators in templates are normalised to LF.
            if c == '\r' {
                if chars.get(i) == Some(&'\n') {
                    i += 1;
                };
                out.push('\n');
            } else if char_to_lone_surrogate(c).is_some() {
                return Err(err(SyntaxErrorType::ReservedCharacterInString));
            } else {
                out.push(c);
            };
            continue;
        };
        let e = *chars
            .get(i)
            .ok_or_else(|| err(SyntaxErrorType::InvalidCharacterEscape))?;
        i += 1;
        match e {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'v' => out.push('\x0b'),
            // Line continuations.
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '\r' => {
                if chars.get(i) == Some(&'\n') {
                    i += 1;
                };
            }
            '0'..='7' => {
                // `\0` not followed by a digit, or a legacy octal escape of up to three digits
                // with a value below 256.
                let mut value = e.to_digit(8).unwrap_or(0);
                let max_len = if e <= '3' { 3 } else { 2 };
                let mut len = 1;
                while len < max_len {
                    match chars.get(i).and_then(|c| c.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            i += 1;
                            len += 1;
                        }
                        None => break,
                    };
                }
                out.push(char::from_u32(value).unwrap_or('\0'));
            }
            'x' => {
                let value = read_hex(&chars, &mut i, 2, true)
                    .ok_or_else(|| err(SyntaxErrorType::InvalidCharacterEscape))?;
                out.push(char::from_u32(value).unwrap_or('\0'));
            }
            'u' => {
                let unit = if chars.get(i) == Some(&'{') {
                    i += 1;
                    let value = read_hex(&chars, &mut i, 8, false)
                        .filter(|v| *v <= 0x10FFFF)
                        .ok_or_else(|| err(SyntaxErrorType::InvalidCharacterEscape))?;
                    if chars.get(i) != Some(&'}') {
                        return Err(err(SyntaxErrorType::InvalidCharacterEscape));
                    };
                    i += 1;
                    value
                } else {
                    read_hex(&chars, &mut i, 4, true)
                        .ok_or_else(|| err(SyntaxErrorType::InvalidCharacterEscape))?
                };
                let c = match unit {
                    0xD800..=0xDBFF => {
                        // High surrogate, paired with a directly following `\uXXXX` low surrogate if any.
                        let mut j = i;
                        let low = if chars.get(j) == Some(&'\\') && chars.get(j + 1) == Some(&'u') {
                            j += 2;
                            read_hex(&chars, &mut j, 4, true)
                        } else {
                            None
                        };
                        match low {
                            Some(low @ 0xDC00..=0xDFFF) => {
                                i = j;
                                Some(0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00))
                                    .filter(|c| *c < LONE_SURROGATE_BASE)
                                    .and_then(char::from_u32)
                            }
                            _ => lone_surrogate_to_char(unit),
                        }
                    }
                    0xDC00..=0xDFFF => lone_surrogate_to_char(unit),
                    unit => char::from_u32(unit).filter(|c| char_to_lone_surrogate(*c).is_none()),
                };
                out.push(c.ok_or_else(|| err(SyntaxErrorType::ReservedCharacterInString))?);
            }
            other if char_to_lone_surrogate(other).is_some() => {
                return Err(err(SyntaxErrorType::ReservedCharacterInString));
            }
            other => out.push(other),
        };
    }
    Ok(out)
}

pub fn normalise_literal_string(raw: &SourceRange) -> SyntaxResult<String> {
    let text = raw.as_str();
    decode_escapes(raw, &text[1..text.len() - 1])
}

pub fn parse_and_normalise_literal_string(parser: &mut Parser) -> SyntaxResult<String> {
    let t = parser.require(TokenType::LiteralString)?;
    normalise_literal_string(t.loc())
}

pub fn is_member_key_name(typ: TokenType) -> bool {
    typ == TokenType::Identifier
        || typ == TokenType::PrivateMember
        || typ.is_word()
}

// <key> = <ident> | <keyword> | <#private> | <str> | <num> | '[' <expr> ']'
pub fn parse_class_or_object_member_key(
    parser: &mut Parser,
) -> SyntaxResult<ClassOrObjectMemberKey> {
    Ok(if parser.consume_if(TokenType::BracketOpen)?.is_match() {
        let expr = parse_expr(parser, TokenType::BracketClose)?;
        parser.require(TokenType::BracketClose)?;
        ClassOrObjectMemberKey::Computed(expr)
    } else {
        let t = parser.next()?;
        match t.typ() {
            TokenType::LiteralString => {
                ClassOrObjectMemberKey::String(normalise_literal_string(t.loc())?)
            }
            TokenType::LiteralNumber => {
                ClassOrObjectMemberKey::Number(normalise_literal_number(t.loc())?)
            }
            typ if is_member_key_name(typ) => ClassOrObjectMemberKey::Direct(t.loc_take()),
            _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("property key"))),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(code: &str) -> SyntaxResult<String> {
        normalise_literal_string(&SourceRange::anonymous(code))
    }

    fn number(code: &str) -> f64 {
        normalise_literal_number(&SourceRange::anonymous(code))
            .unwrap()
            .0
    }

    #[test]
    fn test_normalise_literal_number() {
        assert_eq!(number("1_000"), 1000.0);
        assert_eq!(number("0x1F"), 31.0);
        assert_eq!(number("0b101"), 5.0);
        assert_eq!(number("0o17"), 15.0);
        assert_eq!(number("017"), 15.0);
        assert_eq!(number("019"), 19.0);
        assert_eq!(number(".5"), 0.5);
        assert_eq!(number("1e3"), 1000.0);
    }

    #[test]
    fn test_normalise_literal_string() {
        assert_eq!(string(r#"'a\'b'"#).unwrap(), "a'b");
        assert_eq!(string(r#""\x41B\u{43}""#).unwrap(), "ABC");
        assert_eq!(string(r#""\101""#).unwrap(), "A");
        assert_eq!(string(r#""\0""#).unwrap(), "\0");
        assert_eq!(string("'a\\\nb'").unwrap(), "ab");
        assert_eq!(string(r#""\uD83D\uDE00""#).unwrap(), "\u{1F600}");
        assert_eq!(string(r#""\uD83D""#).unwrap(), "\u{10FC3D}");
        assert_eq!(string(r#""\udFEb""#).unwrap(), "\u{10FFEB}");
        assert_eq!(string(r#""\uDE00\uD83D""#).unwrap(), "\u{10FE00}\u{10FC3D}");
        assert_eq!(
            string("\"\u{10FFEB}\"").unwrap_err().typ(),
            SyntaxErrorType::ReservedCharacterInString
        );
        assert_eq!(
            string(r#""\x4""#).unwrap_err().typ(),
            SyntaxErrorType::InvalidCharacterEscape
        );
    }
}
