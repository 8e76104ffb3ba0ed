// Parser for generic header parameters (;name[=value])

use nom::{
    branch::alt,
    combinator::opt,
    sequence::{pair, preceded},
};

use super::quoted::quoted_string;
use super::token::token;
use super::whitespace::{equal, semi};
use super::ParseResult;
use crate::types::param::Params;

// generic-param = SEMI token [ EQUAL ( token / quoted-string ) ]
fn generic_param(input: &str) -> ParseResult<(&str, Option<&str>)> {
    preceded(semi, pair(token, opt(preceded(equal, alt((token, quoted_string))))))(input)
}

/// Parses zero or more semicolon-preceded parameters.
///
/// Whitespace (including folded line breaks) is allowed around `;` and `=`.
/// Names are lowercased; values are kept as written, quoted strings with their
/// quotes. Parsing never fails: it stops at the first position that does not
/// start a parameter and hands back the rest of the input.
pub fn parse_params(input: &str) -> (Params, &str) {
    let mut params = Params::new();
    let mut rest = input;
    while let Ok((next, (name, value))) = generic_param(rest) {
        params.insert(name.to_lowercase(), value.map(str::to_string));
        rest = next;
    }
    (params, rest)
}
