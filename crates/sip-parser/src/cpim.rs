//! # CPIM message wrapper
//!
//! Parser for `Message/CPIM` content (RFC 3862), as carried in MSRP SEND
//! bodies and SIP MESSAGE requests. A CPIM message has three parts separated
//! by blank lines: the message headers, the headers of the encapsulated MIME
//! content, and the content body.
//!
//! ```
//! use sip_parser::cpim::parse_cpim;
//!
//! let msg = parse_cpim(
//!     "From: <tel:+34666321123>\r\nNS: imdn <urn:ietf:params:imdn>\r\n\r\n\
//!      Content-Type: text/plain\r\n\r\nhello\r\n",
//! )
//! .unwrap();
//! assert_eq!(msg.header("NS"), Some("imdn <urn:ietf:params:imdn>"));
//! assert_eq!(msg.content_header("Content-Type"), Some("text/plain"));
//! assert_eq!(msg.body[0], "hello");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::header_line;

/// One `Name: value` header of a CPIM message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpimHeader {
    pub name: String,
    pub value: String,
}

/// A parsed CPIM message.
///
/// Header names are kept as written (CPIM allows namespaced names such as
/// `imdn.Message-ID`) and repeated names are all kept in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpimMessage {
    pub headers: Vec<CpimHeader>,
    pub content_headers: Vec<CpimHeader>,
    /// Content lines
    pub body: Vec<String>,
}

fn first<'a>(headers: &'a [CpimHeader], name: &str) -> Option<&'a str> {
    headers.iter().find(|h| h.name == name).map(|h| h.value.as_str())
}

impl CpimMessage {
    /// First message header with the given name
    pub fn header(&self, name: &str) -> Option<&str> {
        first(&self.headers, name)
    }

    /// All values of a message header, e.g. `Subject` in several languages
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|h| h.name == name)
            .map(|h| h.value.as_str())
            .collect()
    }

    /// First content header with the given name
    pub fn content_header(&self, name: &str) -> Option<&str> {
        first(&self.content_headers, name)
    }
}

// Reads header lines until a blank line or the end of input
fn parse_header_block<'a, I>(lines: &mut I, section: &str) -> Result<Vec<CpimHeader>>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let mut headers = Vec::new();
    for (idx, line) in lines.by_ref() {
        if line.is_empty() {
            break;
        }
        let (_, (name, value)) = header_line(line).map_err(|_| {
            tracing::debug!(line = idx + 1, section, "CPIM header expected");
            Error::CpimFormat(format!(
                "Invalid header found while parsing CPIM {} (line {}: {})",
                section,
                idx + 1,
                line
            ))
        })?;
        headers.push(CpimHeader {
            name: name.to_string(),
            value: value.to_string(),
        });
    }
    Ok(headers)
}

/// Parses a CPIM message.
///
/// Lines may end in LF or CRLF and are trimmed. Both header sections end at
/// a blank line; everything after the second blank line is the body.
pub fn parse_cpim(input: &str) -> Result<CpimMessage> {
    if input.trim().is_empty() {
        return Err(Error::CpimFormat("Empty CPIM message".to_string()));
    }

    let mut lines = input.split('\n').map(str::trim).enumerate();
    let headers = parse_header_block(&mut lines, "message headers")?;
    let content_headers = parse_header_block(&mut lines, "content headers")?;
    let body = lines.map(|(_, line)| line.to_string()).collect();

    Ok(CpimMessage {
        headers,
        content_headers,
        body,
    })
}

impl FromStr for CpimMessage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_cpim(s)
    }
}

impl fmt::Display for CpimMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for header in &self.headers {
            write!(f, "{}: {}\r\n", header.name, header.value)?;
        }
        f.write_str("\r\n")?;
        for header in &self.content_headers {
            write!(f, "{}: {}\r\n", header.name, header.value)?;
        }
        f.write_str("\r\n")?;
        f.write_str(&self.body.join("\r\n"))
    }
}
