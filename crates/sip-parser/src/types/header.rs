//! Header storage and per-header dispatch.
//!
//! Every header name maps to a [`HeaderKind`], which decides how a raw value
//! is parsed on input, how repeated occurrences are combined and how the
//! value is written back out. The mapping is a static table; names that are
//! not in it are generic scalar headers.

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};

use super::address::Aor;
use super::auth::AuthHeader;
use super::cseq::CSeq;
use super::via::Via;
use crate::error::{Error, Result};
use crate::parser::{
    parse_aor, parse_aor_with_uri, parse_auth_params, parse_auth_with_scheme, parse_cseq,
    parse_multi, parse_via, percent_encode,
};

/// Single-letter header aliases and the names they stand for
pub const COMPACT_FORMS: &[(&str, &str)] = &[
    ("i", "call-id"),
    ("m", "contact"),
    ("e", "contact-encoding"),
    ("l", "content-length"),
    ("c", "content-type"),
    ("f", "from"),
    ("s", "subject"),
    ("k", "supported"),
    ("t", "to"),
    ("v", "via"),
];

/// Expands a compact header name. Other names are returned unchanged.
///
/// The name is expected to be lowercase already.
pub fn expand_compact(name: &str) -> &str {
    COMPACT_FORMS
        .iter()
        .find(|(short, _)| *short == name)
        .map(|(_, full)| *full)
        .unwrap_or(name)
}

/// Normalizes a header name as used for map keys: lowercase, compact forms expanded
pub fn normalize_name(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    expand_compact(&lower).to_string()
}

/// How a header's value is parsed, combined and written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    /// Free text; repeated lines are joined with `,`
    Scalar,
    /// Unsigned integer (Content-Length, Max-Forwards)
    Integer,
    /// A single address with an opaque URI (To, From, Refer-To)
    Aor,
    /// Address list or `*` (Contact)
    AorList,
    /// Address list with decomposed URIs (Route, Record-Route, Path)
    RouteList,
    /// Via entries
    ViaList,
    /// Sequence number and method
    CSeq,
    /// Challenges or credentials, each with a scheme
    AuthWithScheme,
    /// Parameter list without scheme (Authentication-Info)
    AuthNoScheme,
}

impl HeaderKind {
    /// Look up the kind of a normalized header name
    pub fn of(name: &str) -> HeaderKind {
        match name {
            "content-length" | "max-forwards" => HeaderKind::Integer,
            "to" | "from" | "refer-to" => HeaderKind::Aor,
            "contact" => HeaderKind::AorList,
            "route" | "record-route" | "path" => HeaderKind::RouteList,
            "via" => HeaderKind::ViaList,
            "cseq" => HeaderKind::CSeq,
            "www-authenticate" | "proxy-authenticate" | "authorization" | "proxy-authorization" => {
                HeaderKind::AuthWithScheme
            }
            "authentication-info" => HeaderKind::AuthNoScheme,
            _ => HeaderKind::Scalar,
        }
    }

    /// Whether repeated occurrences accumulate into one ordered sequence
    pub fn is_multi(self) -> bool {
        matches!(
            self,
            HeaderKind::AorList | HeaderKind::RouteList | HeaderKind::ViaList | HeaderKind::AuthWithScheme
        )
    }
}

/// Canonical output spelling of a normalized header name.
///
/// Known names use their conventional capitalization. Any other name gets
/// every letter that starts a word upper-cased (`p-access-network-info`
/// becomes `P-Access-Network-Info`).
pub fn display_name(name: &str) -> Cow<'_, str> {
    let known = match name {
        "call-id" => "Call-ID",
        "cseq" => "CSeq",
        "via" => "Via",
        "to" => "To",
        "from" => "From",
        "contact" => "Contact",
        "route" => "Route",
        "record-route" => "Record-Route",
        "path" => "Path",
        "refer-to" => "Refer-To",
        "www-authenticate" => "WWW-Authenticate",
        "proxy-authenticate" => "Proxy-Authenticate",
        "authorization" => "Authorization",
        "proxy-authorization" => "Proxy-Authorization",
        "authentication-info" => "Authentication-Info",
        _ => return Cow::Owned(percent_encode(&prettify_name(name)).into_owned()),
    };
    Cow::Borrowed(known)
}

fn prettify_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;
    for c in name.chars() {
        if at_word_start && c.is_ascii_lowercase() {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}

/// A parsed header value. The variant follows the header's [`HeaderKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Text(String),
    Integer(u32),
    Address(Aor),
    AddressList(Vec<Aor>),
    /// `Contact: *`
    Wildcard,
    Via(Vec<Via>),
    CSeq(CSeq),
    Auth(Vec<AuthHeader>),
    AuthParams(AuthHeader),
}

impl HeaderValue {
    // Combines a repeated occurrence into the stored value
    fn absorb(&mut self, name: &str, incoming: HeaderValue) -> Result<()> {
        match (self, incoming) {
            (HeaderValue::AddressList(list), HeaderValue::AddressList(more)) => list.extend(more),
            (HeaderValue::Via(list), HeaderValue::Via(more)) => list.extend(more),
            (HeaderValue::Auth(list), HeaderValue::Auth(more)) => list.extend(more),
            (HeaderValue::Text(text), HeaderValue::Text(more)) => {
                text.push(',');
                text.push_str(&more);
            }
            (HeaderValue::Wildcard, HeaderValue::Wildcard) => {}
            (HeaderValue::Wildcard, HeaderValue::AddressList(_))
            | (HeaderValue::AddressList(_), HeaderValue::Wildcard) => {
                return Err(Error::MalformedAor(format!(
                    "'{}' cannot mix the '*' wildcard with addresses",
                    name
                )));
            }
            (slot, incoming) => *slot = incoming,
        }
        Ok(())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            HeaderValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<u32> {
        match self {
            HeaderValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&Aor> {
        match self {
            HeaderValue::Address(aor) => Some(aor),
            _ => None,
        }
    }

    pub fn as_address_list(&self) -> Option<&[Aor]> {
        match self {
            HeaderValue::AddressList(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_via(&self) -> Option<&[Via]> {
        match self {
            HeaderValue::Via(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_cseq(&self) -> Option<&CSeq> {
        match self {
            HeaderValue::CSeq(cseq) => Some(cseq),
            _ => None,
        }
    }

    pub fn as_auth(&self) -> Option<&[AuthHeader]> {
        match self {
            HeaderValue::Auth(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_auth_params(&self) -> Option<&AuthHeader> {
        match self {
            HeaderValue::AuthParams(auth) => Some(auth),
            _ => None,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, HeaderValue::Wildcard)
    }

    /// Writes the complete header line(s), without the trailing CRLF
    pub(crate) fn write_line(&self, f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
        let display = display_name(name);
        match self {
            HeaderValue::Text(text) => write!(f, "{}: {}", display, text),
            HeaderValue::Integer(n) => write!(f, "{}: {}", display, n),
            HeaderValue::Address(aor) => write!(f, "{}: {}", display, aor),
            HeaderValue::Wildcard => write!(f, "{}: *", display),
            HeaderValue::AddressList(list) if list.is_empty() && name == "contact" => {
                write!(f, "{}: *", display)
            }
            HeaderValue::AddressList(list) => {
                write!(f, "{}: ", display)?;
                write_joined(f, list)
            }
            HeaderValue::Via(list) => {
                write!(f, "{}: ", display)?;
                write_joined(f, list)
            }
            HeaderValue::CSeq(cseq) => write!(f, "{}: {}", display, cseq),
            // Each challenge is its own `Name: value` segment, concatenated as is
            HeaderValue::Auth(list) => {
                for auth in list {
                    write!(f, "{}: {}", display, auth)?;
                }
                Ok(())
            }
            HeaderValue::AuthParams(auth) => write!(f, "{}: {}", display, auth),
        }
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl Serialize for HeaderValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            HeaderValue::Text(text) => serializer.serialize_str(text),
            HeaderValue::Integer(n) => serializer.serialize_u32(*n),
            HeaderValue::Address(aor) => aor.serialize(serializer),
            HeaderValue::AddressList(list) => list.serialize(serializer),
            HeaderValue::Wildcard => serializer.serialize_str("*"),
            HeaderValue::Via(list) => list.serialize(serializer),
            HeaderValue::CSeq(cseq) => cseq.serialize(serializer),
            HeaderValue::Auth(list) => list.serialize(serializer),
            HeaderValue::AuthParams(auth) => auth.serialize(serializer),
        }
    }
}

// Rejects a list header whose value has text after its last entry
fn finish_list<T>(name: &str, (values, rest): (Vec<T>, &str)) -> Result<Vec<T>> {
    if rest.trim().is_empty() {
        Ok(values)
    } else {
        Err(Error::TrailingData {
            header: name.to_string(),
            remainder: rest.to_string(),
        })
    }
}

/// Ordered header map keyed by normalized (lowercase, expanded) name.
///
/// A key may hold `None`: the header is known but suppressed, and is left out
/// when the message is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(IndexMap<String, Option<HeaderValue>>);

impl Headers {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Parses a raw header value and stores it under `name`.
    ///
    /// List headers append to what is already stored; generic headers are
    /// comma-joined with a previous occurrence; every other kind replaces it.
    pub fn add_from_str(&mut self, name: &str, raw: &str) -> Result<()> {
        let name = normalize_name(name);
        let kind = HeaderKind::of(&name);
        tracing::trace!(header = %name, ?kind, "dispatching header");

        if kind.is_multi() {
            return self.extend_from_str(&name, raw);
        }

        let value = match kind {
            HeaderKind::Integer => {
                let n = raw.trim().parse::<u32>().map_err(|e| Error::MalformedHeader {
                    line: 0,
                    name: name.clone(),
                    reason: format!("expected an integer, got {:?} ({})", raw, e),
                })?;
                HeaderValue::Integer(n)
            }
            // Text after the address is ignored for these
            HeaderKind::Aor => HeaderValue::Address(parse_aor(raw)?.0),
            HeaderKind::CSeq => HeaderValue::CSeq(parse_cseq(raw)?),
            HeaderKind::AuthNoScheme => HeaderValue::AuthParams(parse_auth_params(raw).0),
            _ => HeaderValue::Text(raw.to_string()),
        };

        if kind == HeaderKind::Scalar {
            self.append(name, value)?;
        } else {
            self.0.insert(name, Some(value));
        }
        Ok(())
    }

    /// Parses a comma-separated list value and appends it to `name`.
    ///
    /// Only list headers (Contact, Route, Record-Route, Path, Via and the
    /// authentication challenge family) can be extended.
    pub fn extend_from_str(&mut self, name: &str, raw: &str) -> Result<()> {
        let name = normalize_name(name);
        let incoming = match HeaderKind::of(&name) {
            HeaderKind::AorList if raw.trim() == "*" => HeaderValue::Wildcard,
            HeaderKind::AorList => {
                HeaderValue::AddressList(finish_list(&name, parse_multi(parse_aor, raw)?)?)
            }
            HeaderKind::RouteList => {
                HeaderValue::AddressList(finish_list(&name, parse_multi(parse_aor_with_uri, raw)?)?)
            }
            HeaderKind::ViaList => HeaderValue::Via(finish_list(&name, parse_multi(parse_via, raw)?)?),
            HeaderKind::AuthWithScheme => {
                HeaderValue::Auth(finish_list(&name, parse_multi(parse_auth_with_scheme, raw)?)?)
            }
            _ => return Err(Error::UnsupportedHeaderCombination(name)),
        };
        self.append(name, incoming)
    }

    /// Appends a typed value, combining it with an existing one where the
    /// kinds match (lists are extended, text is comma-joined). A Contact
    /// wildcard cannot be combined with addresses.
    pub fn append(&mut self, name: impl AsRef<str>, value: HeaderValue) -> Result<()> {
        let name = normalize_name(name.as_ref());
        match self.0.get_mut(&name) {
            Some(Some(existing)) => existing.absorb(&name, value)?,
            _ => {
                self.0.insert(name, Some(value));
            }
        }
        Ok(())
    }

    /// Stores a typed value, replacing any previous one
    pub fn insert(&mut self, name: impl AsRef<str>, value: HeaderValue) {
        self.0.insert(normalize_name(name.as_ref()), Some(value));
    }

    /// Keeps the header's position but leaves it out of the serialized message
    pub fn suppress(&mut self, name: impl AsRef<str>) {
        self.0.insert(normalize_name(name.as_ref()), None);
    }

    pub fn remove(&mut self, name: &str) -> Option<HeaderValue> {
        self.0.shift_remove(&normalize_name(name)).flatten()
    }

    /// Get a header's value. Suppressed headers read as absent.
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.0.get(&normalize_name(name)).and_then(Option::as_ref)
    }

    /// True if the name is a key, even when suppressed
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(&normalize_name(name))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order, suppressed ones included
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&HeaderValue>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn via(&self) -> &[Via] {
        self.get("via").and_then(HeaderValue::as_via).unwrap_or(&[])
    }

    pub fn contact(&self) -> &[Aor] {
        self.get("contact").and_then(HeaderValue::as_address_list).unwrap_or(&[])
    }

    pub fn route(&self) -> &[Aor] {
        self.get("route").and_then(HeaderValue::as_address_list).unwrap_or(&[])
    }

    pub fn record_route(&self) -> &[Aor] {
        self.get("record-route").and_then(HeaderValue::as_address_list).unwrap_or(&[])
    }

    pub fn to(&self) -> Option<&Aor> {
        self.get("to").and_then(HeaderValue::as_address)
    }

    pub fn from(&self) -> Option<&Aor> {
        self.get("from").and_then(HeaderValue::as_address)
    }

    pub fn cseq(&self) -> Option<&CSeq> {
        self.get("cseq").and_then(HeaderValue::as_cseq)
    }

    pub fn call_id(&self) -> Option<&str> {
        self.get("call-id").and_then(HeaderValue::as_text)
    }

    pub fn content_length(&self) -> Option<u32> {
        self.get("content-length").and_then(HeaderValue::as_integer)
    }

    pub fn max_forwards(&self) -> Option<u32> {
        self.get("max-forwards").and_then(HeaderValue::as_integer)
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
