use nom::{
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{char, satisfy},
    sequence::delimited,
};

use super::response::sip_version_number;
use super::token::token;
use super::whitespace::sws;
use super::ParseResult;

fn single_space(input: &str) -> ParseResult<char> {
    satisfy(char::is_whitespace)(input)
}

/// Request-Line = Method SP Request-URI SP "SIP" "/" version
///
/// Returns `(method, uri, version)` with the method still percent-encoded.
/// Anything after the version is ignored.
pub(crate) fn request_line(input: &str) -> ParseResult<(&str, &str, &str)> {
    let (input, method) = token(input)?;
    let (input, _) = single_space(input)?;
    let (input, uri) = take_while1(|c: char| !c.is_whitespace())(input)?;
    let (input, _) = single_space(input)?;
    let (input, _) = tag_no_case("SIP")(input)?;
    let (input, _) = delimited(sws, char('/'), sws)(input)?;
    let (input, version) = sip_version_number(input)?;
    Ok((input, (method, uri, version)))
}
