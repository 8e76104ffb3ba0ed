use nom::{
    branch::alt,
    bytes::complete::{take_till, take_while1},
    character::complete::char,
    combinator::{map, opt, recognize, verify},
    multi::many0,
    sequence::{delimited, pair, preceded, tuple},
};

use super::params::parse_params;
use super::quoted::quoted_string;
use super::token::token;
use super::whitespace::{lws, sws};
use super::ParseResult;
use crate::error::{Error, Result};
use crate::types::address::Aor;
use crate::types::uri::UriRef;

// display-name = *(token LWS) / quoted-string
fn display_name(input: &str) -> ParseResult<&str> {
    alt((quoted_string, recognize(pair(token, many0(pair(lws, token))))))(input)
}

// name-addr = [ display-name ] LAQUOT addr-spec RAQUOT
fn name_addr(input: &str) -> ParseResult<(Option<&str>, &str)> {
    tuple((
        opt(display_name),
        preceded(
            sws,
            delimited(char('<'), map(take_till(|c| c == '>'), str::trim), char('>')),
        ),
    ))(input)
}

// A URI given without angle brackets ends at whitespace, `;` or `,`
fn addr_spec(input: &str) -> ParseResult<&str> {
    verify(
        take_while1(|c: char| !c.is_whitespace() && c != ';' && c != ','),
        |s: &str| !s.starts_with('<') && !s.starts_with('"'),
    )(input)
}

/// Parses one address-of-record followed by its header parameters.
///
/// Accepts the `["display name"] <uri>` form and the bare URI form. The URI
/// is kept opaque. Returns the address and whatever text follows it.
pub fn parse_aor(input: &str) -> Result<(Aor, &str)> {
    let parsed: ParseResult<(Option<&str>, &str)> =
        alt((name_addr, map(addr_spec, |uri| (None, uri))))(input);
    let (rest, (name, uri)) = parsed.map_err(|_| {
        tracing::debug!(input, "address did not match name-addr or addr-spec");
        Error::MalformedAor(input.to_string())
    })?;

    let (params, rest) = parse_params(rest);
    let aor = Aor {
        name: name.map(str::to_string),
        uri: UriRef::Opaque(uri.to_string()),
        params,
    };
    Ok((aor, rest))
}

/// Parses an address-of-record and decomposes its URI.
///
/// Used for Route, Record-Route and Path, whose URIs are always needed.
pub fn parse_aor_with_uri(input: &str) -> Result<(Aor, &str)> {
    let (mut aor, rest) = parse_aor(input)?;
    if aor.uri.is_empty() {
        return Err(Error::MalformedAor(format!("no URI to parse in {:?}", input)));
    }
    aor.uri = UriRef::Parsed(aor.uri.resolve()?);
    Ok((aor, rest))
}
