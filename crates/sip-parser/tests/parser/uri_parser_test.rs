// SIP URI parser tests

use std::str::FromStr;

use sip_parser::parser::parse_uri;
use sip_parser::types::Uri;
use sip_parser::Error;

#[test]
fn test_uri_ipv6_with_params() {
    let uri = parse_uri(
        "sip:[2a05:d014:aa00:2203:9408:00a7:cc2c:39f6]:5061;transport=tls;r2=on;lr;ftag=5eff5f3f048e43e1",
    )
    .unwrap();
    assert_eq!(uri.scheme, "sip");
    assert_eq!(uri.user, None);
    assert_eq!(uri.password, None);
    assert_eq!(uri.host, "[2a05:d014:aa00:2203:9408:00a7:cc2c:39f6]");
    assert_eq!(uri.port, Some(5061));
    assert_eq!(uri.params.value("transport"), Some("tls"));
    assert_eq!(uri.params.value("r2"), Some("on"));
    assert_eq!(uri.params.get("lr"), Some(None));
    assert_eq!(uri.params.value("ftag"), Some("5eff5f3f048e43e1"));
}

#[test]
fn test_uri_user_password() {
    let uri = Uri::from_str("sips:uuu:ppp@127.0.0.1:5060;aaaa").unwrap();
    assert_eq!(uri.scheme, "sips");
    assert_eq!(uri.user.as_deref(), Some("uuu"));
    assert_eq!(uri.password.as_deref(), Some("ppp"));
    assert_eq!(uri.to_string(), "sips:uuu:ppp@127.0.0.1:5060;aaaa");
}

#[test]
fn test_uri_display_is_stable() {
    for text in [
        "sip:127.0.0.1:5060;lr",
        "sip:alice@atlanta.com",
        "sip:services.example.com;lr;unknownwith=value;unknown-no-value",
        "sip:[2001:db8::1]:5061;transport=tls",
    ] {
        assert_eq!(parse_uri(text).unwrap().to_string(), text);
    }
}

#[test]
fn test_uri_rejects_other_schemes() {
    assert!(matches!(parse_uri("tel:+15551234567"), Err(Error::MalformedUri(_))));
    assert!(matches!(parse_uri("sip:"), Err(Error::MalformedUri(_))));
}
