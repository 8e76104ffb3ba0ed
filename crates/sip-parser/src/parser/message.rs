use super::request::request_line;
use super::response::status_line;
use super::utils::percent_decode;
use crate::error::{Error, Result};
use crate::types::header::Headers;
use crate::types::sip_message::{SipMessage, StartLine};
use crate::types::uri::UriRef;

/// Splits a header block into logical lines.
///
/// A CRLF followed by a space or tab continues the current line, and stays
/// part of its text.
fn logical_lines(block: &str) -> Vec<&str> {
    let bytes = block.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut search = 0;

    while let Some(offset) = block[search..].find("\r\n") {
        let at = search + offset;
        if matches!(bytes.get(at + 2), Some(b' ') | Some(b'\t')) {
            search = at + 2;
            continue;
        }
        lines.push(&block[start..at]);
        start = at + 2;
        search = start;
    }
    lines.push(&block[start..]);
    lines
}

fn parse_start_line(line: &str) -> Result<StartLine> {
    if let Ok((_, (version, status, reason))) = status_line(line) {
        tracing::trace!(status, "classified as response");
        return Ok(StartLine::Response {
            status,
            reason: reason.to_string(),
            version: version.to_string(),
        });
    }

    if let Ok((_, (method, uri, version))) = request_line(line) {
        tracing::trace!(method, "classified as request");
        return Ok(StartLine::Request {
            method: percent_decode(method).into_owned(),
            uri: UriRef::Opaque(uri.to_string()),
            version: version.to_string(),
        });
    }

    tracing::debug!(line, "start line is neither a request nor a response");
    Err(Error::MalformedMessage(format!(
        "neither a request nor a response: {:?}",
        line
    )))
}

// header-line = name *WSP ":" value, the name itself holds no whitespace
fn split_header_line(line: &str, line_no: usize) -> Result<(String, &str)> {
    let malformed = |reason: &str| Error::MalformedHeader {
        line: line_no,
        name: String::new(),
        reason: format!("{}: {:?}", reason, line),
    };

    let (name, value) = line.split_once(':').ok_or_else(|| malformed("missing ':'"))?;
    let name = name.trim_end();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(malformed("invalid header name"));
    }

    Ok((percent_decode(name).to_lowercase(), value.trim_start()))
}

/// Parses a complete SIP message.
///
/// The input must contain the blank line (`CRLF CRLF`) that ends the header
/// block; everything after it is the body, taken verbatim. Header lines may
/// be folded, use compact names and any case. Errors raised while parsing a
/// header carry its logical line number (the start line is line 1) and name.
///
/// # Examples
///
/// ```
/// use sip_parser::parse_message;
///
/// let msg = parse_message(
///     "REGISTER sip:x SIP/2.0\r\nVia: SIP/2.0/TCP 127.0.0.1:51372;branch=b1;rport\r\n\r\n",
/// )
/// .unwrap();
/// assert_eq!(msg.method(), Some("REGISTER"));
/// let via = &msg.headers.via()[0];
/// assert_eq!(via.port, Some(51372));
/// assert_eq!(via.params.get("rport"), Some(None));
/// ```
pub fn parse_message(input: &str) -> Result<SipMessage> {
    let input = input.trim_start();
    let (head, content) = input.split_once("\r\n\r\n").ok_or_else(|| {
        tracing::debug!("no blank line between headers and body");
        Error::MalformedMessage(
            "couldn't find header/body division (headers must be followed by an empty line)".to_string(),
        )
    })?;

    let lines = logical_lines(head);
    let start_line = parse_start_line(lines[0])?;

    let mut headers = Headers::new();
    for (idx, line) in lines.iter().enumerate().skip(1) {
        let line_no = idx + 1;
        let (name, value) = split_header_line(line, line_no)?;
        headers.add_from_str(&name, value).map_err(|e| {
            tracing::debug!(line = line_no, header = %name, error = %e, "header rejected");
            e.in_header(line_no, &name)
        })?;
    }

    Ok(SipMessage {
        start_line,
        headers,
        content: content.to_string(),
    })
}
