use nom::{
    bytes::complete::tag,
    character::complete::{char, digit1, multispace0, multispace1},
    combinator::{recognize, rest},
    sequence::tuple,
};

use super::ParseResult;

// SIP-Version = "SIP/" 1*DIGIT "." 1*DIGIT, returns the number part
pub(crate) fn sip_version_number(input: &str) -> ParseResult<&str> {
    recognize(tuple((digit1, char('.'), digit1)))(input)
}

/// Status-Line = "SIP/" version SP status-code [SP] reason-phrase
///
/// Returns `(version, status, reason)`. The status code must fit in a `u16`.
pub(crate) fn status_line(input: &str) -> ParseResult<(&str, u16, &str)> {
    let (input, (_, version, _, status, _, reason)) = tuple((
        tag("SIP/"),
        sip_version_number,
        multispace1,
        digit1,
        multispace0,
        rest,
    ))(input)?;

    let status = status.parse::<u16>().map_err(|_| {
        nom::Err::Error(nom::error::Error::new(status, nom::error::ErrorKind::Digit))
    })?;

    Ok((input, (version, status, reason)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line() {
        assert_eq!(status_line("SIP/2.0 200 OK"), Ok(("", ("2.0", 200, "OK"))));
        assert_eq!(
            status_line("SIP/2.0 486 Busy Here"),
            Ok(("", ("2.0", 486, "Busy Here")))
        );
        assert_eq!(status_line("SIP/2.0 100"), Ok(("", ("2.0", 100, ""))));
    }

    #[test]
    fn test_status_line_rejects_requests() {
        assert!(status_line("INVITE sip:a@b SIP/2.0").is_err());
        assert!(status_line("SIP/2.0 OK 200").is_err());
        assert!(status_line("SIP/2.0 99999 Huge").is_err());
    }
}
