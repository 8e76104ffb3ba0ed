//! # Message construction from structured data
//!
//! A [`MessageSpec`] describes a message as plain data, usually decoded from
//! JSON:
//!
//! ```json
//! {
//!   "method": "REGISTER",
//!   "uri": "sip:registrar.biloxi.com",
//!   "headers": {
//!     "via": "SIP/2.0/UDP bobspc.biloxi.com:5060;branch=z9hG4bKnashds7",
//!     "route": [{"uri": {"host": "10.0.0.1", "params": {"lr": null}}}],
//!     "max-forwards": 70,
//!     "user-agent": null
//!   }
//! }
//! ```
//!
//! Header values that are strings go through the same dispatch as parsed
//! header lines, so a message built from data and the same message parsed
//! from text stringify identically. Objects are decoded into the typed value
//! of the header, numbers feed integer headers and `null` keeps the header
//! as a suppressed key.
//!
//! [`MessageBuilder`] is the fluent counterpart for building messages in code.

mod simple;

pub use simple::MessageBuilder;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::types::address::Aor;
use crate::types::auth::AuthHeader;
use crate::types::cseq::CSeq;
use crate::types::header::{normalize_name, HeaderKind, HeaderValue, Headers};
use crate::types::sip_message::{SipMessage, StartLine};
use crate::types::uri::UriRef;
use crate::types::via::Via;

/// Structured description of a SIP message.
///
/// Exactly one of the request fields (`method`, `uri`) or the response
/// fields (`status`, `reason`) may be used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<UriRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

// Lists the names of the fields that are set
fn present(fields: &[(&'static str, bool)]) -> Vec<&'static str> {
    fields.iter().filter(|(_, set)| *set).map(|(name, _)| *name).collect()
}

impl MessageSpec {
    /// Validates the description and builds the message
    pub fn build(self) -> Result<SipMessage> {
        let start_line = self.start_line()?;

        let headers = match self.headers {
            Some(headers) if !headers.is_empty() => headers,
            _ => {
                return Err(Error::InvalidBuild(
                    "headers must be a non-empty mapping".to_string(),
                ))
            }
        };

        let mut built = Headers::new();
        for (name, value) in headers {
            add_json_header(&mut built, &name, value)?;
        }

        Ok(SipMessage {
            start_line,
            headers: built,
            content: self.content.unwrap_or_default(),
        })
    }

    fn start_line(&self) -> Result<StartLine> {
        let request_fields = present(&[("method", self.method.is_some()), ("uri", self.uri.is_some())]);
        let response_fields = present(&[("status", self.status.is_some()), ("reason", self.reason.is_some())]);
        let version = self.version.clone().unwrap_or_else(|| "2.0".to_string());

        // A status code makes it a response; otherwise any request field makes it a request
        if self.status.is_some() || (request_fields.is_empty() && !response_fields.is_empty()) {
            if !request_fields.is_empty() {
                return Err(Error::InvalidBuild(format!(
                    "Found request properties ({}) in response message",
                    request_fields.join(", ")
                )));
            }
            let (Some(status), Some(reason)) = (self.status, self.reason.clone()) else {
                return Err(Error::InvalidBuild(
                    "a response needs both status and reason".to_string(),
                ));
            };
            return Ok(StartLine::Response { status, reason, version });
        }

        if !request_fields.is_empty() {
            if !response_fields.is_empty() {
                return Err(Error::InvalidBuild(format!(
                    "Found response properties ({}) in request message",
                    response_fields.join(", ")
                )));
            }
            let (Some(method), Some(uri)) = (self.method.clone(), self.uri.clone()) else {
                return Err(Error::InvalidBuild(
                    "a request needs both method and uri".to_string(),
                ));
            };
            return Ok(StartLine::Request { method, uri, version });
        }

        Err(Error::InvalidBuild(
            "neither request (method, uri) nor response (status, reason) properties found".to_string(),
        ))
    }
}

fn invalid_value(name: &str, value: &Value) -> Error {
    Error::InvalidBuild(format!("unsupported value for header '{}': {}", name, value))
}

// Decodes an object into the typed value for the header kind
fn typed_value(name: &str, kind: HeaderKind, value: Value) -> Result<HeaderValue> {
    let typed = match kind {
        HeaderKind::Aor => HeaderValue::Address(serde_json::from_value::<Aor>(value)?),
        HeaderKind::AorList => HeaderValue::AddressList(vec![serde_json::from_value::<Aor>(value)?]),
        HeaderKind::RouteList => {
            let mut aor = serde_json::from_value::<Aor>(value)?;
            if aor.uri.is_empty() {
                return Err(Error::InvalidBuild(format!("empty uri in '{}' entry", name)));
            }
            aor.uri = UriRef::Parsed(aor.uri.resolve()?);
            HeaderValue::AddressList(vec![aor])
        }
        HeaderKind::ViaList => HeaderValue::Via(vec![serde_json::from_value::<Via>(value)?]),
        HeaderKind::CSeq => HeaderValue::CSeq(serde_json::from_value::<CSeq>(value)?),
        HeaderKind::AuthWithScheme => HeaderValue::Auth(vec![serde_json::from_value::<AuthHeader>(value)?]),
        HeaderKind::AuthNoScheme => HeaderValue::AuthParams(serde_json::from_value::<AuthHeader>(value)?),
        HeaderKind::Scalar | HeaderKind::Integer => return Err(invalid_value(name, &value)),
    };
    Ok(typed)
}

// Adds one occurrence of a header; arrays are unrolled by the caller
fn add_occurrence(headers: &mut Headers, name: &str, kind: HeaderKind, value: Value) -> Result<()> {
    match value {
        Value::String(raw) => headers.add_from_str(name, &raw),
        Value::Number(n) => match (kind, n.as_u64().and_then(|n| u32::try_from(n).ok())) {
            (HeaderKind::Integer, Some(n)) => {
                headers.insert(name, HeaderValue::Integer(n));
                Ok(())
            }
            (HeaderKind::Integer, None) => Err(invalid_value(name, &Value::Number(n))),
            _ => headers.add_from_str(name, &n.to_string()),
        },
        Value::Object(_) => {
            let typed = typed_value(name, kind, value)?;
            headers.append(name, typed)
        }
        other => Err(invalid_value(name, &other)),
    }
}

fn add_json_header(headers: &mut Headers, name: &str, value: Value) -> Result<()> {
    let name = normalize_name(name);
    let kind = HeaderKind::of(&name);
    tracing::trace!(header = %name, ?kind, "building header from data");

    match value {
        Value::Null => {
            headers.suppress(&name);
            Ok(())
        }
        Value::Array(items) if kind.is_multi() || kind == HeaderKind::Scalar => {
            if items.is_empty() {
                return Err(Error::InvalidBuild(format!("empty list for header '{}'", name)));
            }
            items
                .into_iter()
                .try_for_each(|item| add_occurrence(headers, &name, kind, item))
        }
        Value::Array(_) => Err(Error::InvalidBuild(format!(
            "header '{}' takes a single value, not a list",
            name
        ))),
        value => add_occurrence(headers, &name, kind, value),
    }
}

impl SipMessage {
    /// Builds a message from its JSON description (see [`MessageSpec`])
    pub fn from_json(value: Value) -> Result<Self> {
        serde_json::from_value::<MessageSpec>(value)?.build()
    }

    /// Builds a message from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str::<MessageSpec>(json)?.build()
    }
}
