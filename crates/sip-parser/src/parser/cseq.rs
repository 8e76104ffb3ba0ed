use nom::{
    bytes::complete::take_while1,
    character::complete::digit1,
    sequence::tuple,
};

use super::utils::percent_decode;
use super::whitespace::sws;
use crate::error::{Error, Result};
use crate::types::cseq::CSeq;

/// Parses a CSeq value: `<digits> <method>`.
///
/// Leading zeros are accepted and the method is percent-decoded. Text after
/// the method is ignored.
pub fn parse_cseq(input: &str) -> Result<CSeq> {
    let parsed = tuple((
        digit1,
        sws,
        take_while1(|c: char| !c.is_whitespace()),
    ))(input.trim_start());
    let (_, (seq, _, method)) = parsed.map_err(|_| Error::MalformedCseq(input.to_string()))?;

    let seq = seq
        .parse::<u32>()
        .map_err(|_| Error::MalformedCseq(format!("sequence number out of range: {}", seq)))?;

    Ok(CSeq {
        seq,
        method: percent_decode(method).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cseq() {
        assert_eq!(parse_cseq("1 REGISTER").unwrap(), CSeq::new(1, "REGISTER"));
        assert_eq!(parse_cseq("0009\r\n  INVITE").unwrap(), CSeq::new(9, "INVITE"));
        assert_eq!(parse_cseq("42 M%41GIC").unwrap(), CSeq::new(42, "MAGIC"));
    }

    #[test]
    fn test_parse_cseq_failures() {
        assert!(matches!(parse_cseq("INVITE 1"), Err(Error::MalformedCseq(_))));
        assert!(matches!(parse_cseq("12"), Err(Error::MalformedCseq(_))));
        assert!(matches!(parse_cseq("99999999999 INVITE"), Err(Error::MalformedCseq(_))));
    }

    #[test]
    fn test_cseq_from_str_round_trip() {
        let cseq: CSeq = "314159 INVITE".parse().unwrap();
        assert_eq!(cseq.to_string(), "314159 INVITE");
    }
}
