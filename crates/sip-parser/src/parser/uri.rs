use indexmap::IndexMap;
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag_no_case, take_while1},
    character::complete::{char, digit1},
    combinator::{all_consuming, opt, recognize},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
};

use super::token::is_word_char;
use super::ParseResult;
use crate::error::{Error, Result};
use crate::types::param::Params;
use crate::types::uri::Uri;

type RawUri<'a> = (
    &'a str,
    Option<(&'a str, Option<&'a str>)>,
    &'a str,
    Option<&'a str>,
    Vec<(&'a str, Option<&'a str>)>,
    Option<Vec<(&'a str, &'a str)>>,
);

fn scheme(input: &str) -> ParseResult<&str> {
    terminated(alt((tag_no_case("sips"), tag_no_case("sip"))), char(':'))(input)
}

// userinfo = user [ ":" password ] "@"
fn userinfo(input: &str) -> ParseResult<(&str, Option<&str>)> {
    terminated(
        pair(
            take_while1(|c: char| !c.is_whitespace() && !matches!(c, '>' | ':' | '@')),
            opt(preceded(
                char(':'),
                take_while1(|c: char| !c.is_whitespace() && !matches!(c, '@' | '>')),
            )),
        ),
        char('@'),
    )(input)
}

// IPv6 references are kept opaque, brackets included
fn ipv6_reference(input: &str) -> ParseResult<&str> {
    recognize(delimited(char('['), is_not("]"), char(']')))(input)
}

fn hostname(input: &str) -> ParseResult<&str> {
    take_while1(|c: char| is_word_char(c) || c == '-' || c == '.')(input)
}

fn host(input: &str) -> ParseResult<&str> {
    alt((ipv6_reference, hostname))(input)
}

fn port(input: &str) -> ParseResult<&str> {
    preceded(char(':'), digit1)(input)
}

// uri-parameter = ";" pname [ "=" pvalue ]
fn uri_param(input: &str) -> ParseResult<(&str, Option<&str>)> {
    preceded(
        char(';'),
        pair(
            take_while1(|c: char| !c.is_whitespace() && !matches!(c, '=' | '?' | '>' | ';')),
            opt(preceded(
                char('='),
                take_while1(|c: char| !c.is_whitespace() && !matches!(c, '?' | ';')),
            )),
        ),
    )(input)
}

fn header_part(input: &str) -> ParseResult<&str> {
    take_while1(|c: char| !c.is_whitespace() && !matches!(c, '&' | '=' | '>'))(input)
}

// headers = "?" header *( "&" header )
fn uri_headers(input: &str) -> ParseResult<Vec<(&str, &str)>> {
    preceded(
        char('?'),
        separated_list1(char('&'), separated_pair(header_part, char('='), header_part)),
    )(input)
}

fn sip_uri(input: &str) -> ParseResult<RawUri<'_>> {
    tuple((
        scheme,
        opt(userinfo),
        host,
        opt(port),
        many0(uri_param),
        opt(uri_headers),
    ))(input)
}

/// Parses a complete `sip:` or `sips:` URI.
///
/// The whole input must be consumed. Hosts are matched permissively; a
/// bracketed IPv6 reference is accepted as an opaque host. A parameter
/// without `=value` maps to `None`.
///
/// # Examples
///
/// ```
/// use sip_parser::parser::parse_uri;
///
/// let uri = parse_uri("sip:uuu:ppp@127.0.0.1:5060;aaaa").unwrap();
/// assert_eq!(uri.user.as_deref(), Some("uuu"));
/// assert_eq!(uri.password.as_deref(), Some("ppp"));
/// assert_eq!(uri.port, Some(5060));
/// assert_eq!(uri.params.get("aaaa"), Some(None));
/// ```
pub fn parse_uri(input: &str) -> Result<Uri> {
    let (_, (scheme, userinfo, host, port, params, headers)) = all_consuming(sip_uri)(input)
        .map_err(|_| Error::MalformedUri(input.to_string()))?;

    let port = port
        .map(|p| p.parse::<u16>())
        .transpose()
        .map_err(|_| Error::MalformedUri(format!("port out of range in {}", input)))?;

    let (user, password) = match userinfo {
        Some((user, password)) => (Some(user.to_string()), password.map(str::to_string)),
        None => (None, None),
    };

    Ok(Uri {
        scheme: scheme.to_string(),
        user,
        password,
        host: host.to_string(),
        port,
        params: params
            .into_iter()
            .map(|(name, value)| (name, value.map(str::to_string)))
            .collect::<Params>(),
        headers: headers
            .unwrap_or_default()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect::<IndexMap<_, _>>(),
    })
}
