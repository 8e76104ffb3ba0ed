//! # Message Session Relay Protocol framing
//!
//! Parser and serializer for MSRP requests and responses (RFC 4975):
//!
//! ```text
//! MSRP a786hjs2 SEND
//! To-Path: msrp://biloxi.example.com:12763/kjhd37s2s20w2a;tcp
//! From-Path: msrp://atlanta.example.com:7654/jshA7weztas;tcp
//! Message-ID: 87652491
//! Byte-Range: 1-25/25
//! Content-Type: text/plain
//!
//! Hello bob, congratulation to your graduation!
//! -------a786hjs2$
//! ```
//!
//! Header names are case-sensitive and limited to the ones RFC 4975 defines.
//! The body is kept as a list of lines; a message without a body has no
//! blank line and goes straight from its headers to the end-line.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::header_line;

/// Header names accepted in an MSRP message
pub const VALID_HEADERS: &[&str] = &[
    "To-Path",
    "From-Path",
    "Message-ID",
    "Success-Report",
    "Failure-Report",
    "Byte-Range",
    "Status",
    "Content-Type",
];

const END_LINE_PREFIX: &str = "-------";

/// MSRP request methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MsrpMethod {
    Send,
    Report,
}

impl MsrpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MsrpMethod::Send => "SEND",
            MsrpMethod::Report => "REPORT",
        }
    }
}

impl FromStr for MsrpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "SEND" => Ok(MsrpMethod::Send),
            "REPORT" => Ok(MsrpMethod::Report),
            other => Err(Error::MsrpFormat(format!("Invalid method {}", other))),
        }
    }
}

/// Whether a request carries a request method or a response status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MsrpKind {
    Request { method: MsrpMethod },
    Response { code: u16, text: String },
}

/// The flag that closes the end-line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContinuationFlag {
    /// `$`: last chunk of the message
    #[default]
    Complete,
    /// `+`: more chunks follow
    Continued,
    /// `#`: the sender aborted the message
    Aborted,
}

impl ContinuationFlag {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '$' => Some(ContinuationFlag::Complete),
            '+' => Some(ContinuationFlag::Continued),
            '#' => Some(ContinuationFlag::Aborted),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            ContinuationFlag::Complete => '$',
            ContinuationFlag::Continued => '+',
            ContinuationFlag::Aborted => '#',
        }
    }
}

/// A parsed MSRP message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsrpMessage {
    pub transaction_id: String,
    #[serde(flatten)]
    pub kind: MsrpKind,
    pub headers: IndexMap<String, String>,
    /// Body lines, `None` when the message has no body
    pub content: Option<Vec<String>>,
    #[serde(default)]
    pub continuation: ContinuationFlag,
}

impl MsrpMessage {
    pub fn request(transaction_id: impl Into<String>, method: MsrpMethod) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            kind: MsrpKind::Request { method },
            headers: IndexMap::new(),
            content: None,
            continuation: ContinuationFlag::Complete,
        }
    }

    pub fn response(transaction_id: impl Into<String>, code: u16, text: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            kind: MsrpKind::Response {
                code,
                text: text.into(),
            },
            headers: IndexMap::new(),
            content: None,
            continuation: ContinuationFlag::Complete,
        }
    }

    pub fn method(&self) -> Option<MsrpMethod> {
        match self.kind {
            MsrpKind::Request { method } => Some(method),
            MsrpKind::Response { .. } => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self.kind {
            MsrpKind::Response { code, .. } => Some(code),
            MsrpKind::Request { .. } => None,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Set a header; only the names in [`VALID_HEADERS`] are accepted
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        if !VALID_HEADERS.contains(&name) {
            return Err(Error::MsrpFormat(format!("Unexpected header found: {}", name)));
        }
        self.headers.insert(name.to_string(), value.into());
        Ok(())
    }

    fn end_line(&self) -> String {
        format!("{}{}{}", END_LINE_PREFIX, self.transaction_id, self.continuation.as_char())
    }
}

// MSRP <id> SEND|REPORT  or  MSRP <id> <code> <text...>
fn parse_start_line(line: &str) -> Result<(String, MsrpKind)> {
    let tokens: Vec<&str> = line.split(' ').collect();
    if tokens.first() != Some(&"MSRP") {
        return Err(Error::MsrpFormat("Expected header to begin with 'MSRP'".to_string()));
    }

    match tokens.as_slice() {
        [_, id, method] => Ok((id.to_string(), MsrpKind::Request { method: method.parse()? })),
        [_, id, code, text @ ..] => {
            let code = code
                .parse::<u16>()
                .map_err(|_| Error::MsrpFormat("Found a status code that is not a number".to_string()))?;
            Ok((
                id.to_string(),
                MsrpKind::Response {
                    code,
                    text: text.join(" "),
                },
            ))
        }
        _ => Err(Error::MsrpFormat(format!("Incomplete MSRP start line: {}", line))),
    }
}

// `-------<id><flag>` for this message's transaction id
fn parse_end_line(line: &str, transaction_id: &str) -> Option<ContinuationFlag> {
    let rest = line.strip_prefix(END_LINE_PREFIX)?.strip_prefix(transaction_id)?;
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(flag), None) => ContinuationFlag::from_char(flag),
        _ => None,
    }
}

/// Parses an MSRP message.
///
/// Lines may end in LF or CRLF and are trimmed; blank lines after the
/// end-line are ignored, anything else after it is an error.
pub fn parse_msrp(input: &str) -> Result<MsrpMessage> {
    let mut lines: Vec<&str> = input.split('\n').map(str::trim).collect();
    while lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    let (transaction_id, kind) = parse_start_line(lines[0])?;
    let mut message = MsrpMessage {
        transaction_id,
        kind,
        headers: IndexMap::new(),
        content: None,
        continuation: ContinuationFlag::Complete,
    };

    let mut idx = 1;
    let mut end = None;
    while idx < lines.len() {
        let line = lines[idx];
        if line.is_empty() {
            idx += 1;
            break;
        }
        if let Ok((_, (name, value))) = header_line(line) {
            message.set_header(name, value)?;
            idx += 1;
            continue;
        }
        match parse_end_line(line, &message.transaction_id) {
            Some(flag) => {
                end = Some((idx, flag));
                break;
            }
            None => {
                return Err(Error::MsrpFormat(format!(
                    "Unexpected format on line {}. Expected header, content start, or end of message",
                    idx + 1
                )))
            }
        }
    }

    let (end_idx, flag) = match end {
        Some(end) => end,
        None => {
            let content_start = idx;
            let (offset, flag) = lines[content_start..]
                .iter()
                .enumerate()
                .find_map(|(i, line)| parse_end_line(line, &message.transaction_id).map(|f| (i, f)))
                .ok_or_else(|| Error::MsrpFormat("Could not find end of message line!".to_string()))?;
            let body = &lines[content_start..content_start + offset];
            message.content = Some(body.iter().map(|l| l.to_string()).collect());
            (content_start + offset, flag)
        }
    };
    message.continuation = flag;

    if lines.len() > end_idx + 1 {
        tracing::debug!(id = %message.transaction_id, "MSRP data after end-line");
        return Err(Error::MsrpFormat(format!(
            "More lines found in MSRP message after message end marker (total lines: {}, last parsed line: {})",
            lines.len(),
            end_idx
        )));
    }

    Ok(message)
}

impl FromStr for MsrpMessage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_msrp(s)
    }
}

impl fmt::Display for MsrpMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            MsrpKind::Request { method } => write!(f, "MSRP {} {}\r\n", self.transaction_id, method.as_str())?,
            MsrpKind::Response { code, text } => {
                write!(f, "MSRP {} {:03} {}\r\n", self.transaction_id, code, text)?
            }
        }
        for (name, value) in &self.headers {
            write!(f, "{}: {}\r\n", name, value)?;
        }
        if let Some(content) = &self.content {
            f.write_str("\r\n")?;
            for line in content {
                write!(f, "{}\r\n", line)?;
            }
        }
        write!(f, "{}\r\n", self.end_line())
    }
}
