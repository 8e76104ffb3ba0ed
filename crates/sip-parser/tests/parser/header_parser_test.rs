// Sub-parser tests for header values

use sip_parser::parser::{
    parse_aor, parse_aor_with_uri, parse_auth_with_scheme, parse_cseq, parse_multi, parse_params,
    parse_via, percent_decode, unquote,
};
use sip_parser::Error;

#[test]
fn test_parse_aor_forms() {
    let (aor, rest) = parse_aor("\"Bob\" <sip:bob@biloxi.com>;tag=a6c85cf").unwrap();
    assert_eq!(aor.name.as_deref(), Some("\"Bob\""));
    assert_eq!(aor.uri.to_string(), "sip:bob@biloxi.com");
    assert_eq!(aor.tag(), Some("a6c85cf"));
    assert_eq!(rest, "");

    let (aor, _) = parse_aor("Bob Smith <sip:bob@biloxi.com>").unwrap();
    assert_eq!(aor.name.as_deref(), Some("Bob Smith"));

    let (aor, rest) = parse_aor("sip:bob@biloxi.com;tag=1, <sip:c@d>").unwrap();
    assert_eq!(aor.name, None);
    assert_eq!(aor.uri.to_string(), "sip:bob@biloxi.com");
    assert_eq!(aor.tag(), Some("1"));
    assert_eq!(rest, ", <sip:c@d>");
}

#[test]
fn test_parse_aor_with_uri_decomposes() {
    let (aor, _) = parse_aor_with_uri("<sip:p1.example.com;lr>").unwrap();
    let uri = aor.uri.parsed().unwrap();
    assert_eq!(uri.host, "p1.example.com");
    assert!(uri.is_loose_routing());

    assert!(parse_aor_with_uri("<>").is_err());
}

#[test]
fn test_parse_via_list() {
    let (vias, rest) = parse_multi(
        parse_via,
        "SIP/2.0/UDP first.example.com:4000;branch=z9hG4bKa, SIP / 2.0 / TCP second.example.com;received=192.0.2.1",
    )
    .unwrap();
    assert_eq!(rest, "");
    assert_eq!(vias.len(), 2);
    assert_eq!(vias[0].port, Some(4000));
    assert_eq!(vias[1].protocol, "TCP");
    assert_eq!(vias[1].params.value("received"), Some("192.0.2.1"));
}

#[test]
fn test_parse_via_failures() {
    assert!(matches!(parse_via("SIP/2.0/UDP"), Err(Error::MalformedVia(_))));
    assert!(matches!(parse_via("HTTP/1.1/TCP host"), Err(Error::MalformedVia(_))));
    assert!(matches!(parse_via("SIP/2.0/UDP host:70000"), Err(Error::MalformedVia(_))));
}

#[test]
fn test_parse_cseq_values() {
    let cseq = parse_cseq("0009\r\n  INVITE").unwrap();
    assert_eq!((cseq.seq, cseq.method.as_str()), (9, "INVITE"));
    assert!(matches!(parse_cseq("INVITE"), Err(Error::MalformedCseq(_))));
}

#[test]
fn test_parse_auth_challenges() {
    let (challenges, rest) = parse_multi(
        parse_auth_with_scheme,
        r#"Digest realm="atlanta.com", qop="auth,auth-int", nonce="84a4cc6f", Digest realm="biloxi.com", nonce="1""#,
    )
    .unwrap();
    assert_eq!(rest, "");
    assert_eq!(challenges.len(), 2);
    assert_eq!(challenges[0].get("qop"), Some("\"auth,auth-int\""));
    assert_eq!(challenges[1].get_unquoted("realm").as_deref(), Some("biloxi.com"));
}

#[test]
fn test_parse_params_whitespace() {
    let (params, rest) = parse_params(" ;   tag    = 1918181833n ; lr");
    assert_eq!(rest, "");
    assert_eq!(params.value("tag"), Some("1918181833n"));
    assert_eq!(params.get("lr"), Some(None));
}

#[test]
fn test_text_helpers() {
    assert_eq!(unquote(r#""a \"b\" c""#), r#"a "b" c"#);
    assert_eq!(percent_decode("IN%56ITE"), "INVITE");
}
