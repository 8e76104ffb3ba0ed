use super::whitespace::comma;
use crate::error::Result;

/// Applies `parse_fn` to a comma-separated header value.
///
/// The parser is applied once, then again after every `,` (with surrounding
/// whitespace) that follows an entry. Returns the entries in order and the
/// text left after the last one; callers decide whether leftover is an error.
///
/// # Examples
///
/// ```
/// use sip_parser::parser::{parse_multi, parse_via};
///
/// let (vias, rest) = parse_multi(parse_via, "SIP/2.0/UDP a;branch=1, SIP/2.0/TCP b").unwrap();
/// assert_eq!(vias.len(), 2);
/// assert_eq!(vias[1].host, "b");
/// assert!(rest.is_empty());
/// ```
pub fn parse_multi<'a, T, F>(mut parse_fn: F, input: &'a str) -> Result<(Vec<T>, &'a str)>
where
    F: FnMut(&'a str) -> Result<(T, &'a str)>,
{
    let (first, mut rest) = parse_fn(input)?;
    let mut values = vec![first];

    while let Ok((next, _)) = comma(rest) {
        let (value, after) = parse_fn(next)?;
        values.push(value);
        rest = after;
    }

    Ok((values, rest))
}
