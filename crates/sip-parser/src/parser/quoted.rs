use nom::{
    branch::alt,
    bytes::complete::is_not,
    character::complete::{anychar, char},
    combinator::recognize,
    multi::many0,
    sequence::{delimited, pair},
};

use super::ParseResult;

// quoted-pair = "\" any-char
fn quoted_pair(input: &str) -> ParseResult<&str> {
    recognize(pair(char('\\'), anychar))(input)
}

/// Recognizes a double-quoted string with backslash escapes.
///
/// The returned slice includes the surrounding quotes and keeps escape
/// sequences untouched; callers that need the text use [`unquote`].
pub(crate) fn quoted_string(input: &str) -> ParseResult<&str> {
    recognize(delimited(
        char('"'),
        many0(alt((is_not("\"\\"), quoted_pair))),
        char('"'),
    ))(input)
}

/// Strips surrounding quotes and resolves backslash escapes.
///
/// Text that is not quoted is returned unchanged.
pub fn unquote(input: &str) -> String {
    let inner = match input.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) => inner,
        None => return input.to_string(),
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
