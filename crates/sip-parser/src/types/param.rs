use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An ordered `;name[=value]` parameter list.
///
/// A parameter given without `=value` (e.g. `;lr`) maps to `None`, which is
/// distinct from an empty value. Names are unique: inserting an existing name
/// overwrites the value in place and keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(IndexMap<String, Option<String>>);

impl Params {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Set a parameter, replacing any previous value under the same name
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        self.0.insert(name.into(), value);
    }

    /// Get a parameter's value. Returns `Some(None)` for a flag parameter.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.0.get(name).map(|v| v.as_deref())
    }

    /// Get a parameter's value, treating flags and absent parameters alike
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).flatten()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Option<String>> {
        self.0.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.0 {
            write!(f, ";{}", name)?;
            // `;name=` is not representable, an empty value is written as a flag
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                write!(f, "={}", value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_display() {
        let mut params = Params::new();
        params.insert("branch", Some("z9hG4bK776".to_string()));
        params.insert("rport", None);
        params.insert("empty", Some(String::new()));
        assert_eq!(params.to_string(), ";branch=z9hG4bK776;rport;empty");
    }

    #[test]
    fn test_params_overwrite_keeps_position() {
        let mut params = Params::new();
        params.insert("a", Some("1".into()));
        params.insert("b", None);
        params.insert("a", Some("2".into()));
        assert_eq!(params.to_string(), ";a=2;b");
        assert_eq!(params.get("b"), Some(None));
        assert_eq!(params.value("a"), Some("2"));
        assert_eq!(params.get("c"), None);
    }

    #[test]
    fn test_params_json_shape() {
        let params: Params = [("lr", None), ("transport", Some("tcp".to_string()))]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!({"lr": null, "transport": "tcp"}));
        let back: Params = serde_json::from_value(json).unwrap();
        assert_eq!(back, params);
    }
}
