use nom::bytes::complete::take_while1;
use nom::character::complete::{char, multispace0};
use nom::combinator::rest;
use nom::sequence::{separated_pair, terminated};

use super::token::is_word_char;
use super::ParseResult;

/// A `Name: value` line of the MIME-like header blocks in MSRP and CPIM.
///
/// Names are word characters, `-` and `.` (so `imdn.Message-ID` is one
/// name); the value is the rest of the line after optional whitespace.
pub(crate) fn header_line(input: &str) -> ParseResult<(&str, &str)> {
    separated_pair(
        take_while1(|c: char| is_word_char(c) || c == '-' || c == '.'),
        terminated(char(':'), multispace0),
        rest,
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_line() {
        assert_eq!(header_line("Byte-Range: 1-25/25"), Ok(("", ("Byte-Range", "1-25/25"))));
        assert_eq!(header_line("imdn.Message-ID:1816f9kChg"), Ok(("", ("imdn.Message-ID", "1816f9kChg"))));
        assert_eq!(header_line("Subject:;lang=fr beau temps"), Ok(("", ("Subject", ";lang=fr beau temps"))));
        assert_eq!(header_line("Empty:"), Ok(("", ("Empty", ""))));
        assert!(header_line("no header here").is_err());
        assert!(header_line("-------a786hjs2$").is_err());
    }
}
