use indexmap::IndexMap;
use nom::{
    branch::alt,
    bytes::complete::{take_till, take_while1},
    character::complete::char,
    sequence::{terminated, tuple},
};

use super::quoted::quoted_string;
use super::whitespace::{equal, lws, sws};
use super::ParseResult;
use crate::error::{Error, Result};
use crate::types::auth::AuthHeader;

// auth-param = name EQUAL ( token / quoted-string ), trailing whitespace eaten
fn auth_param(input: &str) -> ParseResult<(&str, &str)> {
    let (input, name) = take_till(|c: char| c.is_whitespace() || matches!(c, ',' | '"' | '='))(input)?;
    let (input, _) = equal(input)?;
    let (input, value) = terminated(
        alt((
            quoted_string,
            take_while1(|c: char| !c.is_whitespace() && !matches!(c, ',' | '"')),
        )),
        sws,
    )(input)?;
    Ok((input, (name, value)))
}

/// Parses a comma-separated `name=value` list without a leading scheme
/// (Authentication-Info, or the part of a challenge after its scheme).
///
/// Commas inside quoted values are not separators. Values keep their quotes.
/// Parsing stops silently at the first position that is not another
/// parameter; a comma that is not followed by a parameter is left in the
/// returned rest, so a caller can treat it as the start of the next entry.
pub fn parse_auth_params(input: &str) -> (AuthHeader, &str) {
    let mut params = IndexMap::new();
    let mut rest = input;

    while let Ok((next, (name, value))) = auth_param(rest) {
        params.insert(name.to_string(), value.to_string());
        rest = next;

        let after_comma = match tuple((char(','), sws))(rest) {
            Ok((after, _)) if auth_param(after).is_ok() => after,
            _ => break,
        };
        rest = after_comma;
    }

    (AuthHeader { scheme: None, params }, rest)
}

/// Parses a challenge or credentials value: `<scheme> name=value, ...`
pub fn parse_auth_with_scheme(input: &str) -> Result<(AuthHeader, &str)> {
    let scheme: ParseResult<&str> =
        terminated(take_till(|c: char| c.is_whitespace()), lws)(input);
    let (rest, scheme) = scheme.map_err(|_| {
        Error::MalformedAuth(format!("could not extract scheme from {:?}", input))
    })?;

    let (mut auth, rest) = parse_auth_params(rest);
    auth.scheme = Some(scheme.to_string());
    Ok((auth, rest))
}
