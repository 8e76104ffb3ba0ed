use std::fmt;

use serde::{Deserialize, Serialize};

use super::param::Params;
use super::uri::UriRef;
use crate::parser::unquote;

/// An address-of-record: optional display name, URI and header parameters.
///
/// Used by To, From, Refer-To, Contact and the Route family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aor {
    /// Display name exactly as written, quotes and escapes included
    #[serde(default)]
    pub name: Option<String>,
    pub uri: UriRef,
    #[serde(default)]
    pub params: Params,
}

impl Aor {
    pub fn new(uri: impl Into<UriRef>) -> Self {
        Self {
            name: None,
            uri: uri.into(),
            params: Params::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: Option<&str>) -> Self {
        self.params.insert(name, value.map(str::to_string));
        self
    }

    /// The display name with quotes removed and escapes resolved
    pub fn display_name(&self) -> Option<String> {
        self.name.as_deref().map(unquote)
    }

    /// The `tag` parameter, if any
    pub fn tag(&self) -> Option<&str> {
        self.params.value("tag")
    }
}

impl fmt::Display for Aor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // name-addr form is always used on output (RFC 3261 section 7.3.1)
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            write!(f, "{} ", name)?;
        }
        write!(f, "<{}>{}", self.uri, self.params)
    }
}
