use std::str::FromStr;

use nom::character::complete::char;
use nom::combinator::{all_consuming, opt};
use nom::multi::{many0, many1};
use nom::sequence::{pair, tuple};

use super::types::*;
use crate::error::{Error, Result};
use crate::parser::ParseResult;

const ORDER_ERROR: &str = "Incorrect SDP header order detected";

/// One `key=value` line together with its 1-based line number
#[derive(Debug, Clone, Copy)]
struct Field<'a> {
    line: usize,
    key: char,
    value: &'a str,
}

fn sdp_error(line: usize, reason: impl Into<String>) -> Error {
    Error::SdpFormat {
        line,
        reason: reason.into(),
    }
}

fn split_fields(input: &str) -> Result<Vec<Field<'_>>> {
    let mut lines: Vec<&str> = input.split('\n').map(str::trim).collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| sdp_error(i + 1, format!("expected <type>=<value>, got {:?}", line)))?;
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(key), None) if key.is_ascii_lowercase() => Ok(Field {
                    line: i + 1,
                    key,
                    value,
                }),
                _ => Err(sdp_error(i + 1, format!("invalid field type {:?}", key))),
            }
        })
        .collect()
}

// m i? c* b* k? a*
fn media_block(input: &str) -> ParseResult<()> {
    let (input, _) = tuple((
        char('m'),
        opt(char('i')),
        many0(char('c')),
        many0(char('b')),
        opt(char('k')),
        many0(char('a')),
    ))(input)?;
    Ok((input, ()))
}

// v o s i? u? e? p? c? b* (t r*)+ z? k? a* (media block)*
fn field_order(input: &str) -> ParseResult<()> {
    let (input, _) = tuple((char('v'), char('o'), char('s')))(input)?;
    let (input, _) = tuple((
        opt(char('i')),
        opt(char('u')),
        opt(char('e')),
        opt(char('p')),
        opt(char('c')),
        many0(char('b')),
    ))(input)?;
    let (input, _) = many1(pair(char('t'), many0(char('r'))))(input)?;
    let (input, _) = tuple((opt(char('z')), opt(char('k')), many0(char('a'))))(input)?;
    let (input, _) = many0(media_block)(input)?;
    Ok((input, ()))
}

fn check_order(fields: &[Field<'_>]) -> Result<()> {
    let keys: String = fields.iter().map(|f| f.key).collect();
    let parsed = all_consuming(field_order)(keys.as_str());
    match parsed {
        Ok(_) => Ok(()),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
            let line = (keys.len() - e.input.len() + 1).min(keys.len().max(1));
            tracing::debug!(order = %keys, line, "SDP fields out of order");
            Err(sdp_error(line, ORDER_ERROR))
        }
        Err(nom::Err::Incomplete(_)) => Err(sdp_error(keys.len(), ORDER_ERROR)),
    }
}

fn subfields<const N: usize>(field: &Field<'_>, what: &str) -> Result<[String; N]> {
    let parts: Vec<String> = field.value.split(' ').map(str::to_string).collect();
    let found = parts.len();
    parts.try_into().map_err(|_| {
        sdp_error(
            field.line,
            format!("{} ({}=) needs {} sub-fields, found {}", what, field.key, N, found),
        )
    })
}

fn parse_version(field: &Field<'_>) -> Result<u8> {
    if field.value != "0" {
        return Err(sdp_error(
            field.line,
            format!(
                "Unexpected SDP protocol version number {}. Only version 0 supported",
                field.value
            ),
        ));
    }
    Ok(0)
}

fn parse_origin(field: &Field<'_>) -> Result<Origin> {
    let [username, session_id, session_version, net_type, addr_type, unicast_address] =
        subfields::<6>(field, "origin")?;
    Ok(Origin {
        username,
        session_id,
        session_version,
        net_type,
        addr_type,
        unicast_address,
    })
}

fn parse_connection(field: &Field<'_>) -> Result<ConnectionData> {
    let [net_type, addr_type, connection_address] = subfields::<3>(field, "connection data")?;
    Ok(ConnectionData {
        net_type,
        addr_type,
        connection_address,
    })
}

fn parse_timing(field: &Field<'_>) -> Result<Timing> {
    let [start_time, stop_time] = subfields::<2>(field, "timing")?;
    Ok(Timing {
        start_time,
        stop_time,
    })
}

fn parse_repeat(field: &Field<'_>) -> Result<RepeatTimes> {
    let mut parts = field.value.split(' ').map(str::to_string);
    match (parts.next(), parts.next()) {
        (Some(repeat_interval), Some(active_duration)) => Ok(RepeatTimes {
            repeat_interval,
            active_duration,
            offsets: parts.collect(),
        }),
        _ => Err(sdp_error(
            field.line,
            "repeat times (r=) need an interval and a duration",
        )),
    }
}

// media port[/number] proto fmt...
fn parse_media(field: &Field<'_>) -> Result<MediaField> {
    let mut parts = field.value.splitn(4, ' ');
    let (Some(media), Some(port_field), Some(proto), Some(fmt)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(sdp_error(
            field.line,
            format!("media description (m=) needs media, port, proto and fmt: {:?}", field.value),
        ));
    };

    let invalid_port = || {
        sdp_error(
            field.line,
            format!("Invalid media description's port sub-field found: <{}>", port_field),
        )
    };
    let (port, number_of_ports) = match port_field.split_once('/') {
        Some((port, count)) => (port.parse::<u16>(), count.parse::<u16>()),
        None => (port_field.parse::<u16>(), Ok(1)),
    };

    Ok(MediaField {
        media: media.to_string(),
        port: port.map_err(|_| invalid_port())?,
        number_of_ports: number_of_ports.map_err(|_| invalid_port())?,
        proto: proto.to_string(),
        fmt: fmt.to_string(),
    })
}

fn parse_attribute(field: &Field<'_>) -> Attribute {
    match field.value.split_once(':') {
        Some((name, value)) => Attribute::Value(name.to_string(), value.to_string()),
        None => Attribute::Flag(field.value.to_string()),
    }
}

fn parse_media_description(fields: &[Field<'_>]) -> Result<MediaDescription> {
    let Some((first, rest)) = fields.split_first() else {
        return Err(sdp_error(0, ORDER_ERROR));
    };
    let mut desc = MediaDescription::new(parse_media(first)?);
    for field in rest {
        match field.key {
            'i' => desc.media_title = Some(field.value.to_string()),
            'c' => desc.connections.push(parse_connection(field)?),
            'b' => desc.bandwidths.push(field.value.to_string()),
            'k' => desc.encryption_key = Some(field.value.to_string()),
            'a' => desc.attributes.push(parse_attribute(field)),
            _ => return Err(sdp_error(field.line, ORDER_ERROR)),
        }
    }
    Ok(desc)
}

fn parse_time_descriptions(fields: &[Field<'_>]) -> Result<Vec<TimeDescription>> {
    let mut descriptions: Vec<TimeDescription> = Vec::new();
    for field in fields {
        match field.key {
            't' => descriptions.push(TimeDescription {
                timing: parse_timing(field)?,
                repeat_times: Vec::new(),
            }),
            'r' => match descriptions.last_mut() {
                Some(current) => current.repeat_times.push(parse_repeat(field)?),
                None => return Err(sdp_error(field.line, ORDER_ERROR)),
            },
            _ => return Err(sdp_error(field.line, ORDER_ERROR)),
        }
    }
    Ok(descriptions)
}

fn parse_session(fields: &[Field<'_>]) -> Result<SessionDescription> {
    let [version, origin, name, rest @ ..] = fields else {
        return Err(sdp_error(fields.len(), ORDER_ERROR));
    };

    let mut session = SessionDescription {
        version: parse_version(version)?,
        origin: parse_origin(origin)?,
        session_name: name.value.to_string(),
        information: None,
        uri: None,
        email: None,
        phone: None,
        connection: None,
        bandwidths: Vec::new(),
        time_zones: None,
        encryption_key: None,
        attributes: Vec::new(),
    };

    for field in rest {
        let value = || Some(field.value.to_string());
        match field.key {
            'i' => session.information = value(),
            'u' => session.uri = value(),
            'e' => session.email = value(),
            'p' => session.phone = value(),
            'c' => session.connection = Some(parse_connection(field)?),
            'b' => session.bandwidths.push(field.value.to_string()),
            'z' => session.time_zones = value(),
            'k' => session.encryption_key = value(),
            'a' => session.attributes.push(parse_attribute(field)),
            _ => return Err(sdp_error(field.line, ORDER_ERROR)),
        }
    }
    Ok(session)
}

/// Parses an SDP body (RFC 4566).
///
/// Lines may end in LF or CRLF; surrounding whitespace on each line and
/// trailing blank lines are ignored. The sequence of field types must follow
/// the order RFC 4566 section 5 prescribes, otherwise the message is
/// rejected with the line where the order breaks.
///
/// # Examples
///
/// ```
/// use sip_parser::sdp::parse_sdp;
///
/// let sdp = parse_sdp(
///     "v=0\r\no=- 1 1 IN IP4 192.0.2.1\r\ns=-\r\nt=0 0\r\nm=audio 49170 RTP/AVP 0 8\r\na=sendrecv\r\n",
/// )
/// .unwrap();
/// assert_eq!(sdp.media_descriptions[0].media.port, 49170);
/// assert_eq!(sdp.media_descriptions[0].media.formats().collect::<Vec<_>>(), ["0", "8"]);
/// ```
pub fn parse_sdp(input: &str) -> Result<SdpMessage> {
    let fields = split_fields(input)?;
    check_order(&fields)?;

    let media_start = fields.iter().position(|f| f.key == 'm').unwrap_or(fields.len());
    let (session_fields, media_fields) = fields.split_at(media_start);

    let (time_fields, other_fields): (Vec<Field<'_>>, Vec<Field<'_>>) = session_fields
        .iter()
        .copied()
        .partition(|f| matches!(f.key, 't' | 'r'));

    // Each m= line opens a media description that runs to the next one
    let mut media_descriptions = Vec::new();
    let mut rest = media_fields;
    while !rest.is_empty() {
        let len = 1 + rest[1..].iter().position(|f| f.key == 'm').unwrap_or(rest.len() - 1);
        media_descriptions.push(parse_media_description(&rest[..len])?);
        rest = &rest[len..];
    }

    Ok(SdpMessage {
        session: parse_session(&other_fields)?,
        time_descriptions: parse_time_descriptions(&time_fields)?,
        media_descriptions,
    })
}

impl FromStr for SdpMessage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_sdp(s)
    }
}
