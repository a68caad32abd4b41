//! URL encoding for provider query strings
//!
//! Providers expect `application/x-www-form-urlencoded` style escaping: every
//! byte outside the unreserved set is percent-encoded and spaces become `+`.

use std::fmt::Write;

/// Percent-encode a string for use in URL query parameters
///
/// Encodes all characters except unreserved characters (`A-Z`, `a-z`, `0-9`,
/// `-`, `_`, `.`, `~`). Spaces are encoded as `+`.
pub fn encode(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 3);
    for c in input.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '~' => result.push(c),
            ' ' => result.push('+'),
            _ => {
                let mut buf = [0u8; 4];
                for b in c.encode_utf8(&mut buf).as_bytes() {
                    let _ = write!(result, "%{b:02X}");
                }
            },
        }
    }
    result
}
