//! Reader for Lua short strings, following the escapes of the Lua lexer.

use test_log::test;

/// Read a complete `'...'` or `"..."` literal and return the string it denotes.
pub(super) fn read_short_string(literal: &str) -> Result<String, String> {
    let mut chars = literal.chars();
    let delimiter = match chars.next() {
        Some(c @ ('\'' | '"')) => c,
        other => return Err(format!("expected a quote, found {other:?}")),
    };

    let mut result = String::new();
    loop {
        match chars.next() {
            None => return Err("unterminated string".to_string()),
            Some('\n' | '\r') => return Err("raw line break in string".to_string()),
            Some('\\') => match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('a') => result.push('\u{7}'),
                Some('b') => result.push('\u{8}'),
                Some('f') => result.push('\u{c}'),
                Some('v') => result.push('\u{b}'),
                Some(c @ ('\\' | '\'' | '"' | '\n')) => result.push(c),
                Some(first @ '0'..='9') => {
                    let mut digits = first.to_string();
                    while digits.len() < 3 {
                        match chars.clone().next() {
                            Some(digit) if digit.is_ascii_digit() => {
                                digits.push(digit);
                                chars.next();
                            }
                            _ => break,
                        }
                    }
                    let byte = digits.parse::<u8>().map_err(|err| err.to_string())?;
                    result.push(char::from(byte));
                }
                other => return Err(format!("invalid escape sequence {other:?}")),
            },
            Some(c) if c == delimiter => break,
            Some(c) => result.push(c),
        }
    }

    match chars.next() {
        None => Ok(result),
        Some(c) => Err(format!("unexpected {c:?} after closing quote")),
    }
}

#[test]
fn reads_lua_escapes() {
    assert_eq!(read_short_string(r"'C:\\temp'").unwrap(), r"C:\temp");
    assert_eq!(read_short_string(r"'C:\temp'").unwrap(), "C:\temp");
    assert_eq!(read_short_string(r"'O\'Brien'").unwrap(), "O'Brien");
    assert_eq!(read_short_string(r"'a\0001'").unwrap(), "a\u{0}1");
    assert!(read_short_string(r"'ends with \'").is_err());
    assert!(read_short_string("'line\nbreak'").is_err());
}
