use nom::{
    character::complete::{char, multispace0, multispace1},
    combinator::recognize,
    sequence::tuple,
};

use super::ParseResult;

// Folded header values keep their CRLF, so CR and LF count as whitespace
// everywhere a value may be split across lines.

/// SWS: zero or more SP / HTAB / CR / LF
pub(crate) fn sws(input: &str) -> ParseResult<&str> {
    multispace0(input)
}

/// LWS: one or more SP / HTAB / CR / LF
pub(crate) fn lws(input: &str) -> ParseResult<&str> {
    multispace1(input)
}

/// A comma with optional whitespace on both sides, as used between list entries
pub(crate) fn comma(input: &str) -> ParseResult<&str> {
    recognize(tuple((sws, char(','), sws)))(input)
}

/// A semicolon with optional whitespace on both sides
pub(crate) fn semi(input: &str) -> ParseResult<&str> {
    recognize(tuple((sws, char(';'), sws)))(input)
}

/// An equals sign with optional whitespace on both sides
pub(crate) fn equal(input: &str) -> ParseResult<&str> {
    recognize(tuple((sws, char('='), sws)))(input)
}
