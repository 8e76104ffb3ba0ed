use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::parser::unquote;

/// A challenge or credentials value (WWW-Authenticate, Authorization, ...)
/// or, without a scheme, an Authentication-Info value.
///
/// Parameter values are stored as written, so quoted values keep their quotes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthHeader {
    #[serde(default)]
    pub scheme: Option<String>,
    #[serde(default)]
    pub params: IndexMap<String, String>,
}

impl AuthHeader {
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: Some(scheme.into()),
            params: IndexMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Raw parameter value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Parameter value with surrounding quotes removed
    pub fn get_unquoted(&self, name: &str) -> Option<String> {
        self.get(name).map(unquote)
    }
}

impl fmt::Display for AuthHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = self.scheme.as_deref().filter(|s| !s.is_empty()) {
            write!(f, "{} ", scheme)?;
        }
        let mut first = true;
        for (name, value) in self.params.iter().filter(|(_, v)| !v.is_empty()) {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{}={}", name, value)?;
            first = false;
        }
        Ok(())
    }
}
