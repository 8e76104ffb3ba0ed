use std::borrow::Cow;

use super::token::is_token_char;

/// Decodes `%XX` escapes in a header name, method or token.
///
/// Decoding is lenient: a `%` that is not followed by two hex digits is kept
/// literally, and byte sequences that do not form valid UTF-8 are replaced
/// with U+FFFD.
pub fn percent_decode(input: &str) -> Cow<'_, str> {
    if !input.contains('%') {
        return Cow::Borrowed(input);
    }

    let bytes = input.as_bytes();
    let mut unescaped: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(v1), Some(v2)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                unescaped.push((v1 << 4) | v2);
                i += 3;
                continue;
            }
        }
        unescaped.push(bytes[i]);
        i += 1;
    }

    Cow::Owned(String::from_utf8_lossy(&unescaped).into_owned())
}

/// Escapes a decoded header name or method so it reads back as one token.
///
/// Every byte of a non-token character is written as `%XX`, and so is `%`
/// itself, which makes `percent_decode(percent_encode(s)) == s`.
pub fn percent_encode(input: &str) -> Cow<'_, str> {
    if input.chars().all(|c| is_token_char(c) && c != '%') {
        return Cow::Borrowed(input);
    }

    let mut escaped = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        if is_token_char(c) && c != '%' {
            escaped.push(c);
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                escaped.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    Cow::Owned(escaped)
}

// Helper to convert a hex character (byte) to its value (0-15)
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
