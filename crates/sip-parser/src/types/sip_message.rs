use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::header::{HeaderValue, Headers};
use super::uri::UriRef;
use crate::error::{Error, Result};
use crate::parser::percent_encode;

/// The first line of a message, which decides whether it is a request or a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StartLine {
    Request {
        method: String,
        uri: UriRef,
        /// Protocol version without the `SIP/` prefix; empty means 2.0
        #[serde(default)]
        version: String,
    },
    Response {
        status: u16,
        reason: String,
        #[serde(default)]
        version: String,
    },
}

impl StartLine {
    pub fn version(&self) -> &str {
        match self {
            StartLine::Request { version, .. } | StartLine::Response { version, .. } => version,
        }
    }
}

impl fmt::Display for StartLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = match self.version() {
            "" => "2.0",
            v => v,
        };
        match self {
            StartLine::Request { method, uri, .. } => {
                write!(f, "{} {} SIP/{}", percent_encode(method), uri, version)
            }
            StartLine::Response { status, reason, .. } => write!(f, "SIP/{} {} {}", version, status, reason),
        }
    }
}

/// A SIP request or response
///
/// Headers keep the order they were added in. The body is opaque text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SipMessage {
    #[serde(flatten)]
    pub start_line: StartLine,
    pub headers: Headers,
    pub content: String,
}

impl SipMessage {
    /// Create an empty request
    pub fn request(method: impl Into<String>, uri: impl Into<UriRef>) -> Self {
        Self {
            start_line: StartLine::Request {
                method: method.into(),
                uri: uri.into(),
                version: "2.0".to_string(),
            },
            headers: Headers::new(),
            content: String::new(),
        }
    }

    /// Create an empty response
    pub fn response(status: u16, reason: impl Into<String>) -> Self {
        Self {
            start_line: StartLine::Response {
                status,
                reason: reason.into(),
                version: "2.0".to_string(),
            },
            headers: Headers::new(),
            content: String::new(),
        }
    }

    pub fn is_request(&self) -> bool {
        matches!(self.start_line, StartLine::Request { .. })
    }

    pub fn is_response(&self) -> bool {
        matches!(self.start_line, StartLine::Response { .. })
    }

    pub fn version(&self) -> &str {
        self.start_line.version()
    }

    /// Request method, `None` for responses
    pub fn method(&self) -> Option<&str> {
        match &self.start_line {
            StartLine::Request { method, .. } => Some(method),
            StartLine::Response { .. } => None,
        }
    }

    /// Request-URI, `None` for responses
    pub fn uri(&self) -> Option<&UriRef> {
        match &self.start_line {
            StartLine::Request { uri, .. } => Some(uri),
            StartLine::Response { .. } => None,
        }
    }

    /// Status code, `None` for requests
    pub fn status(&self) -> Option<u16> {
        match &self.start_line {
            StartLine::Response { status, .. } => Some(*status),
            StartLine::Request { .. } => None,
        }
    }

    /// Reason phrase, `None` for requests
    pub fn reason(&self) -> Option<&str> {
        match &self.start_line {
            StartLine::Response { reason, .. } => Some(reason),
            StartLine::Request { .. } => None,
        }
    }

    /// Get a header by name (case-insensitive, compact forms accepted)
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    /// Content length in bytes as it will be written
    pub fn body_len(&self) -> u32 {
        u32::try_from(self.content.len()).unwrap_or(u32::MAX)
    }

    /// Stores the body length in the Content-Length header.
    ///
    /// Serialization always writes the computed length; this only makes the
    /// stored header agree with it.
    pub fn sync_content_length(&mut self) {
        let len = self.body_len();
        self.headers.insert("content-length", HeaderValue::Integer(len));
    }

    /// Render the message as JSON
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl fmt::Display for SipMessage {
    /// Writes the message in wire format.
    ///
    /// Content-Length always reflects the body's byte length: it stays where
    /// it was if the header exists and is appended last otherwise. Suppressed
    /// headers are skipped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\r\n", self.start_line)?;

        let content_length = HeaderValue::Integer(self.body_len());
        let mut wrote_length = false;
        for (name, value) in self.headers.iter() {
            let value = if name == "content-length" {
                wrote_length = true;
                &content_length
            } else {
                match value {
                    Some(value) => value,
                    None => continue,
                }
            };
            value.write_line(f, name)?;
            f.write_str("\r\n")?;
        }
        if !wrote_length {
            content_length.write_line(f, "content-length")?;
            f.write_str("\r\n")?;
        }

        f.write_str("\r\n")?;
        f.write_str(&self.content)
    }
}

impl FromStr for SipMessage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        crate::parser::parse_message(s)
    }
}
