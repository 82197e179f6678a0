use crate::char::char_to_lone_surrogate;

// Quote characters in order of preference when escape counts tie.
const QUOTES: [u8; 3] = [b'"', b'\'', b'`'];

fn count_escapes(value: &str, quote: u8) -> usize {
    let bytes = value.as_bytes();
    let mut count = 0;
    for (i, &c) in bytes.iter().enumerate() {
        if c == quote {
            count += 1;
        } else if quote == b'`' && c == b'$' && bytes.get(i + 1) == Some(&b'{') {
            count += 1;
        };
    }
    count
}

/// Picks the quote needing the fewest escapes. Template literals are not accepted everywhere a
/// string is (directives, import specifiers, object keys), so they are opt-in.
fn choose_quote(value: &str, allow_template: bool) -> u8 {
    let candidates = if allow_template {
        &QUOTES[..]
    } else {
        &QUOTES[..2]
    };
    let mut best = candidates[0];
    let mut best_count = count_escapes(value, best);
    for &q in &candidates[1..] {
        let count = count_escapes(value, q);
        if count < best_count {
            best = q;
            best_count = count;
        };
    }
    best
}

fn starts_with_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack[..needle.len()].eq_ignore_ascii_case(needle)
}

pub fn emit_string(out: &mut Vec<u8>, value: &str, allow_template: bool) {
    let quote = choose_quote(value, allow_template);
    out.push(quote);
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\0' => {
                // `\0` followed by a digit would be read as a legacy octal escape.
                if bytes.get(i + 1).filter(|c| c.is_ascii_digit()).is_some() {
                    out.extend_from_slice(b"\\x00");
                } else {
                    out.extend_from_slice(b"\\0");
                };
            }
            b'$' if quote == b'`' && bytes.get(i + 1) == Some(&b'{') => {
                out.extend_from_slice(b"\\$");
            }
            b'<' if starts_with_ignore_ascii_case(&bytes[i..], b"</script") => {
                out.extend_from_slice(b"<\\/");
                i += 2;
                continue;
            }
            // U+2028 and U+2029 are line terminators in older engines.
            0xE2 if bytes.get(i + 1) == Some(&0x80)
                && matches!(bytes.get(i + 2), Some(0xA8) | Some(0xA9)) =>
            {
                out.extend_from_slice(if bytes[i + 2] == 0xA8 {
                    b"\\u2028"
                } else {
                    b"\\u2029"
                });
                i += 3;
                continue;
            }
            // Stand-ins for lone surrogates, U+10F800 to U+10FFFF.
            0xF4 if bytes.get(i + 1) == Some(&0x8F)
                && bytes.get(i + 2).map_or(false, |c| *c >= 0xA0) =>
            {
                let unit = value[i..].chars().next().and_then(char_to_lone_surrogate);
                if let Some(unit) = unit {
                    out.extend_from_slice(format!("\\u{:04x}", unit).as_bytes());
                    i += 4;
                    continue;
                };
                out.push(c);
            }
            c if c == quote => {
                out.push(b'\\');
                out.push(c);
            }
            c => out.push(c),
        };
        i += 1;
    }
    out.push(quote);
}

#[cfg(test)]
mod tests {
    use super::emit_string;

    fn quoted(value: &str, allow_template: bool) -> String {
        let mut out = Vec::new();
        emit_string(&mut out, value, allow_template);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_prefers_double_quotes() {
        assert_eq!(quoted("string'string", true), r#""string'string""#);
        assert_eq!(quoted("", true), r#""""#);
    }

    #[test]
    fn test_picks_quote_with_fewest_escapes() {
        assert_eq!(quoted("\"", true), r#"'"'"#);
        assert_eq!(quoted("'\"", true), "`'\"`");
        assert_eq!(quoted("'\"", false), r#""'\"""#);
        assert_eq!(quoted("\"\"''", true), "`\"\"''`");
        assert_eq!(quoted("\"\"''", false), r#""\"\"''""#);
        assert_eq!(quoted("\"'${a}", true), r#""\"'${a}""#);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(quoted("a\\b", true), r#""a\\b""#);
        assert_eq!(quoted("a\nb\rc", true), r#""a\nb\rc""#);
        assert_eq!(quoted("\u{0}", true), r#""\0""#);
        assert_eq!(quoted("\u{0}1", true), r#""\x001""#);
        assert_eq!(quoted("\u{2028}", true), r#""\u2028""#);
        assert_eq!(quoted("</script>", true), r#""<\/script>""#);
        assert_eq!(quoted("</SCRIPT>", true), r#""<\/SCRIPT>""#);
        assert_eq!(quoted("\"'`${", true), r#""\"'`${""#);
    }

    #[test]
    fn test_lone_surrogates_are_escaped() {
        assert_eq!(quoted("\u{10FFEB}", true), r#""\udfeb""#);
        assert_eq!(quoted("a\u{10FC3D}b", true), r#""a\ud83db""#);
        assert_eq!(quoted("\u{10F7FF}", true), "\"\u{10F7FF}\"");
    }
}
