use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::param::Params;
use crate::error::{Error, Result};

/// One entry of a Via header: `SIP/2.0/UDP host:port;params`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Via {
    /// Protocol version, `None` when the sent-protocol omitted it
    #[serde(default)]
    pub version: Option<String>,
    /// Transport, case preserved as parsed
    pub protocol: String,
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub params: Params,
}

impl Via {
    /// Create a new Via entry for SIP/2.0
    pub fn new(protocol: impl Into<String>, host: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            version: Some("2.0".to_string()),
            protocol: protocol.into(),
            host: host.into(),
            port,
            params: Params::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: Option<&str>) -> Self {
        self.params.insert(name, value.map(str::to_string));
        self
    }

    /// Get the branch parameter
    pub fn branch(&self) -> Option<&str> {
        self.params.value("branch")
    }
}

impl fmt::Display for Via {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = self.version.as_deref().filter(|v| !v.is_empty()).unwrap_or("2.0");
        write!(f, "SIP/{}/{} {}", version, self.protocol.to_uppercase(), self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        write!(f, "{}", self.params)
    }
}

impl FromStr for Via {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (via, rest) = crate::parser::parse_via(s)?;
        if !rest.trim().is_empty() {
            return Err(Error::MalformedVia(s.to_string()));
        }
        Ok(via)
    }
}
