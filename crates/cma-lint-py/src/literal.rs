//! Python string literal decoding.

use std::iter::Peekable;
use std::str::Chars;

/// A decoded string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StringLiteral {
    /// Text string, escapes decoded unless raw.
    Str(String),
    /// Bytes literal, as written between the quotes.
    Bytes(String),
    /// f-string or t-string; its value is not known statically.
    Formatted,
}

/// Decodes one string token, prefix and quotes included.
pub(crate) fn parse_string(text: &str) -> StringLiteral {
    let prefix_len = text.find(['\'', '"']).unwrap_or(text.len());
    let (prefix, quoted) = text.split_at(prefix_len);
    let prefix = prefix.to_ascii_lowercase();

    if prefix.contains(['f', 't']) {
        return StringLiteral::Formatted;
    }

    let quote = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") {
        &quoted[..3]
    } else {
        quoted.get(..1).unwrap_or_default()
    };
    let body = quoted
        .strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(quote))
        .unwrap_or(quoted);

    if prefix.contains('b') {
        StringLiteral::Bytes(body.to_string())
    } else if prefix.contains('r') {
        StringLiteral::Str(body.to_string())
    } else {
        StringLiteral::Str(unescape(body))
    }
}

/// Joins the parts of an implicitly concatenated string.
pub(crate) fn concatenate(parts: impl IntoIterator<Item = StringLiteral>) -> StringLiteral {
    let mut text = String::new();
    let mut bytes = false;
    for part in parts {
        match part {
            StringLiteral::Str(s) => text.push_str(&s),
            StringLiteral::Bytes(b) => {
                bytes = true;
                text.push_str(&b);
            }
            StringLiteral::Formatted => return StringLiteral::Formatted,
        }
    }
    if bytes {
        StringLiteral::Bytes(text)
    } else {
        StringLiteral::Str(text)
    }
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\r' => {
                let _ = chars.next_if_eq(&'\n');
            }
            '\\' | '\'' | '"' => out.push(next),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0b}'),
            '0'..='7' => {
                let mut value = next.to_digit(8).unwrap_or_default();
                for _ in 0..2 {
                    match chars.next_if(|d| d.is_digit(8)) {
                        Some(d) => value = value * 8 + d.to_digit(8).unwrap_or_default(),
                        None => break,
                    }
                }
                out.extend(char::from_u32(value));
            }
            'x' => push_hex(&mut out, &mut chars, next, 2),
            'u' => push_hex(&mut out, &mut chars, next, 4),
            'U' => push_hex(&mut out, &mut chars, next, 8),
            // `\N{NAME}` needs the Unicode name table; kept as written.
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    out
}

fn push_hex(out: &mut String, chars: &mut Peekable<Chars<'_>>, marker: char, digits: usize) {
    let mut hex = String::with_capacity(digits);
    while hex.len() < digits {
        match chars.next_if(char::is_ascii_hexdigit) {
            Some(d) => hex.push(d),
            None => break,
        }
    }
    let decoded = (hex.len() == digits)
        .then(|| u32::from_str_radix(&hex, 16).ok())
        .flatten()
        .and_then(char::from_u32);
    match decoded {
        Some(c) => out.push(c),
        None => {
            out.push('\\');
            out.push(marker);
            out.push_str(&hex);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> StringLiteral {
        StringLiteral::Str(s.to_string())
    }

    #[test]
    fn test_plain_quotes() {
        assert_eq!(parse_string("'Error.'"), text("Error."));
        assert_eq!(parse_string("\"Error\""), text("Error"));
        assert_eq!(parse_string("''"), text(""));
    }

    #[test]
    fn test_triple_quotes() {
        assert_eq!(
            parse_string("\"\"\"Multi\nline.\"\"\""),
            text("Multi\nline.")
        );
        assert_eq!(parse_string("''''''"), text(""));
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(parse_string("u'Text.'"), text("Text."));
        assert_eq!(parse_string(r"r'\n'"), text(r"\n"));
        assert_eq!(
            parse_string("b'raw'"),
            StringLiteral::Bytes("raw".to_string())
        );
        assert_eq!(parse_string("f'{x}.'"), StringLiteral::Formatted);
        assert_eq!(parse_string("RF'{x}'"), StringLiteral::Formatted);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(parse_string(r"'a\tb'"), text("a\tb"));
        assert_eq!(parse_string(r"'dot\x2e'"), text("dot."));
        assert_eq!(parse_string(r"'é\U0001F600'"), text("é😀"));
        assert_eq!(parse_string(r"'\101\0'"), text("A\0"));
        assert_eq!(parse_string(r"'it\'s'"), text("it's"));
        assert_eq!(parse_string("'line\\\ncontinued'"), text("linecontinued"));
    }

    #[test]
    fn test_unknown_and_incomplete_escapes_kept() {
        assert_eq!(parse_string(r"'\d'"), text(r"\d"));
        assert_eq!(parse_string(r"'\x4'"), text(r"\x4"));
        assert_eq!(parse_string(r"'\N{BULLET}'"), text(r"\N{BULLET}"));
    }

    #[test]
    fn test_concatenate() {
        assert_eq!(
            concatenate([text("Hello "), text("world.")]),
            text("Hello world.")
        );
        assert_eq!(
            concatenate([text("a"), StringLiteral::Formatted]),
            StringLiteral::Formatted
        );
    }
}
