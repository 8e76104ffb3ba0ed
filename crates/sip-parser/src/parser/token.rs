use nom::bytes::complete::take_while1;

use super::ParseResult;

/// Letters, digits and underscore
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub(crate) fn is_token_char(c: char) -> bool {
    is_word_char(c) || matches!(c, '-' | '.' | '!' | '%' | '*' | '+' | '`' | '\'' | '~')
}

pub(crate) fn token(input: &str) -> ParseResult<&str> {
    // token = 1*(alphanum / "-" / "." / "!" / "%" / "*" / "_" / "+" / "`" / "'" / "~")
    take_while1(is_token_char)(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token() {
        assert_eq!(token("+g.3gpp.cs-voice;video"), Ok((";video", "+g.3gpp.cs-voice")));
        assert_eq!(token("a`b'c~d e"), Ok((" e", "a`b'c~d")));
        assert!(token("\"quoted\"").is_err());
        assert!(token("<sip:x>").is_err());
    }
}
