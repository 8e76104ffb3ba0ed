use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::param::Params;
use crate::error::{Error, Result};

fn default_scheme() -> String {
    "sip".to_string()
}

/// A decomposed `sip:` / `sips:` URI
///
/// `sip:user:password@host:port;uri-parameters?headers`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uri {
    /// `sip` or `sips`, as written
    #[serde(default = "default_scheme", alias = "schema")]
    pub scheme: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Host name, IPv4 address or bracketed IPv6 reference, kept opaque
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
}

impl Uri {
    /// Create a URI with the `sip` scheme and no user part
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            scheme: default_scheme(),
            user: None,
            password: None,
            host: host.into(),
            port: None,
            params: Params::new(),
            headers: IndexMap::new(),
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: Option<&str>) -> Self {
        self.params.insert(name, value.map(str::to_string));
        self
    }

    /// True when the loose-routing flag `;lr` is present
    pub fn is_loose_routing(&self) -> bool {
        self.params.contains("lr")
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = if self.scheme.is_empty() { "sip" } else { &self.scheme };
        write!(f, "{}:", scheme)?;

        if let Some(user) = self.user.as_deref().filter(|u| !u.is_empty()) {
            match self.password.as_deref().filter(|p| !p.is_empty()) {
                Some(password) => write!(f, "{}:{}@", user, password)?,
                None => write!(f, "{}@", user)?,
            }
        }

        write!(f, "{}", self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }

        write!(f, "{}", self.params)?;

        let mut separator = '?';
        for (name, value) in &self.headers {
            write!(f, "{}{}={}", separator, name, value)?;
            separator = '&';
        }
        Ok(())
    }
}

impl FromStr for Uri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        crate::parser::parse_uri(s)
    }
}

/// A URI that is either kept as written or decomposed into fields.
///
/// Request-URIs and To/From/Contact addresses stay opaque; Route-family
/// headers decompose their URIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UriRef {
    Opaque(String),
    Parsed(Uri),
}

impl UriRef {
    /// The decomposed form, if this reference has been parsed
    pub fn parsed(&self) -> Option<&Uri> {
        match self {
            UriRef::Parsed(uri) => Some(uri),
            UriRef::Opaque(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, UriRef::Opaque(s) if s.is_empty())
    }

    /// Decompose an opaque URI. Already-parsed URIs are returned as they are.
    pub fn resolve(self) -> Result<Uri> {
        match self {
            UriRef::Parsed(uri) => Ok(uri),
            UriRef::Opaque(raw) => raw.parse(),
        }
    }
}

impl fmt::Display for UriRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UriRef::Opaque(raw) => f.write_str(raw),
            UriRef::Parsed(uri) => write!(f, "{}", uri),
        }
    }
}

impl From<Uri> for UriRef {
    fn from(uri: Uri) -> Self {
        UriRef::Parsed(uri)
    }
}

impl From<&str> for UriRef {
    fn from(raw: &str) -> Self {
        UriRef::Opaque(raw.to_string())
    }
}

impl From<String> for UriRef {
    fn from(raw: String) -> Self {
        UriRef::Opaque(raw)
    }
}
