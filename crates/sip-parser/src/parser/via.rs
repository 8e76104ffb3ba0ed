use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{char, digit1},
    combinator::{opt, recognize},
    sequence::{delimited, preceded, tuple},
};

use super::params::parse_params;
use super::whitespace::{lws, sws};
use super::ParseResult;
use crate::error::{Error, Result};
use crate::types::via::Via;

fn slash(input: &str) -> ParseResult<char> {
    delimited(sws, char('/'), sws)(input)
}

// sent-protocol = "SIP" SLASH protocol-version SLASH transport
// The version is optional so that `SIP//UDP` still yields a transport.
fn sent_protocol(input: &str) -> ParseResult<(Option<&str>, &str)> {
    let (input, _) = tag_no_case("SIP")(input)?;
    let (input, _) = slash(input)?;
    let (input, version) = opt(recognize(tuple((digit1, char('.'), digit1))))(input)?;
    let (input, _) = slash(input)?;
    let (input, transport) = take_while1(|c: char| !c.is_whitespace())(input)?;
    Ok((input, (version, transport)))
}

fn via_host(input: &str) -> ParseResult<&str> {
    alt((
        recognize(tuple((char('['), take_while1(|c: char| c != ']'), char(']')))),
        take_while1(|c: char| !c.is_whitespace() && !matches!(c, ';' | ':' | ',')),
    ))(input)
}

// sent-by = host [ COLON port ]
fn sent_by(input: &str) -> ParseResult<(&str, Option<&str>)> {
    let (input, host) = via_host(input)?;
    let (input, port) = opt(preceded(tuple((sws, char(':'), sws)), digit1))(input)?;
    Ok((input, (host, port)))
}

/// Parses a single Via entry: `SIP/<version>/<transport> <host>[:<port>]`
/// followed by its parameters.
///
/// Whitespace, including folded line breaks, may appear around `/` and `:`.
/// Returns the entry and the unconsumed rest of the input, which for a
/// comma-joined header starts at the next `,`.
pub fn parse_via(input: &str) -> Result<(Via, &str)> {
    let parsed = tuple((sent_protocol, lws, sent_by))(input);
    let (rest, ((version, protocol), _, (host, port))) = parsed.map_err(|_| {
        tracing::debug!(input, "via did not match sent-protocol and sent-by");
        Error::MalformedVia(input.to_string())
    })?;

    let port = port
        .map(|p| p.parse::<u16>())
        .transpose()
        .map_err(|_| Error::MalformedVia(format!("port out of range in {}", input)))?;

    let (params, rest) = parse_params(rest);
    let via = Via {
        version: version.map(str::to_string),
        protocol: protocol.to_string(),
        host: host.to_string(),
        port,
        params,
    };
    Ok((via, rest))
}
