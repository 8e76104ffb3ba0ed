//! # JSON rendering and path access
//!
//! Every serializable type in this crate gets [`SipJsonExt`], which renders
//! it to JSON and reads fields with a dotted path:
//!
//! - `"headers.via[0].host"` - fields by name, list entries by index
//! - `"headers.route[-1].uri.port"` - negative indices count from the end
//!
//! ```rust
//! use sip_parser::prelude::*;
//!
//! let msg: SipMessage = "OPTIONS sip:carol@chicago.com SIP/2.0\r\n\
//!                        Via: SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bKhjhs8ass877\r\n\r\n"
//!     .parse()
//!     .unwrap();
//! assert_eq!(msg.path_str("headers.via[0].host").as_deref(), Some("pc33.atlanta.com"));
//! assert_eq!(msg.path_str("headers.via[0].params.branch").as_deref(), Some("z9hG4bKhjhs8ass877"));
//! ```

use nom::branch::alt;
use nom::bytes::complete::take_while1;
use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, map, map_res, opt, recognize};
use nom::multi::{many0, separated_list1};
use nom::sequence::{delimited, pair};
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::parser::ParseResult;

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    Field(String),
    Index(i64),
}

fn path_field(input: &str) -> ParseResult<PathSegment> {
    map(
        take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-'),
        |name: &str| PathSegment::Field(name.to_string()),
    )(input)
}

// [N] or [-N]
fn path_index(input: &str) -> ParseResult<PathSegment> {
    delimited(
        char('['),
        map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
            s.parse::<i64>().map(PathSegment::Index)
        }),
        char(']'),
    )(input)
}

// field[index]* or a bare [index]*
fn path_segment(input: &str) -> ParseResult<Vec<PathSegment>> {
    alt((
        map(pair(path_field, many0(path_index)), |(field, indices)| {
            let mut segments = vec![field];
            segments.extend(indices);
            segments
        }),
        map(pair(path_index, many0(path_index)), |(first, rest)| {
            let mut segments = vec![first];
            segments.extend(rest);
            segments
        }),
    ))(input)
}

fn parse_path(path: &str) -> Option<Vec<PathSegment>> {
    all_consuming(separated_list1(char('.'), path_segment))(path)
        .ok()
        .map(|(_, lists)| lists.into_iter().flatten().collect())
}

/// Looks up a dotted path in a JSON value. An empty path is the value itself.
pub fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(root);
    }

    parse_path(path)?
        .iter()
        .try_fold(root, |value, segment| match (segment, value) {
            (PathSegment::Field(name), Value::Object(map)) => map.get(name),
            (PathSegment::Index(idx), Value::Array(items)) => {
                let i = if *idx < 0 {
                    items.len().checked_sub(usize::try_from(idx.unsigned_abs()).ok()?)?
                } else {
                    usize::try_from(*idx).ok()?
                };
                items.get(i)
            }
            _ => None,
        })
}

/// JSON operations on any serializable SIP, SDP, MSRP or CPIM value
pub trait SipJsonExt {
    /// Render as a JSON value
    fn to_json_value(&self) -> Result<Value>;

    fn to_json_string(&self) -> Result<String>;

    fn to_json_string_pretty(&self) -> Result<String>;

    /// The value at a dotted path, or `None` if any step is missing
    fn path(&self, path: impl AsRef<str>) -> Option<Value>;

    /// The value at a dotted path as text. Strings are returned without
    /// quotes; other values use their JSON form.
    fn path_str(&self, path: impl AsRef<str>) -> Option<String> {
        self.path(path).map(|value| match value {
            Value::String(s) => s,
            other => other.to_string(),
        })
    }

    fn path_str_or(&self, path: impl AsRef<str>, default: &str) -> String {
        self.path_str(path).unwrap_or_else(|| default.to_string())
    }
}

impl<T: Serialize> SipJsonExt for T {
    fn to_json_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn path(&self, path: impl AsRef<str>) -> Option<Value> {
        let value = self.to_json_value().ok()?;
        get_path(&value, path.as_ref()).cloned()
    }
}
