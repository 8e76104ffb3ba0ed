// Whole-message parsing: start lines, header dispatch, folding and bodies

use sip_parser::prelude::*;

use crate::common::*;

#[test]
fn test_basic_register_message() {
    let msg = prepare_msg(
        r#"
        REGISTER sip:ims.mnc123.mcc123.3gppnetwork.org SIP/2.0
        Via: SIP/2.0/TCP 127.0.0.1:51372;branch=4y479aZgQ6b15d63F;rport
        Route: <sip:127.0.0.1:5060;lr>
        From: <sip:97321761314732@ims.mnc123.mcc123.3gppnetwork.org>;tag=14028fvx4vg
        To: <sip:97321761314732@ims.mnc123.mcc123.3gppnetwork.org>
        Call-ID: 1111aa63F@127.0.0.1
        CSeq: 1 REGISTER
        Contact: <sip:97321761314732@127.0.0.1:51372;transport=tcp>;expires=600000;+g.3gpp.icsi-ref="urn%3Aurn-7%3A3gpp-service.ims.icsi.mmtel,urn%3Aurn-7%3A3gpp-service.ims.icsi.gsma.callcomposer";+g.3gpp.iari-ref="urn%3Aurn-7%3A3gpp-application.ims.iari.rcse.im,urn%3Aurn-7%3A3gpp-application.ims.iari.rcs.fthttp";+g.3gpp.cs-voice;+g.oma.sip-im;+g.3gpp.smsip;video;+sip.instance="<urn:gsma:imei:12345678-023451-0>"
        Authorization: Digest username="97321761314732@ims.mnc123.mcc123.3gppnetwork.org", realm="ims.mnc123.mcc123.3gppnetwork.org", nonce="", uri="sip:ims.mnc021.mcc658.3gppnetwork.org", response=""
        Max-Forwards: 70
        User-Agent: iPhone 9.0
        Supported: gruu,path,sec-agree,timer
        P-Access-Network-Info: IEEE-802.11;i-wlan-node-id=34a84edc9615
        Content-Length: 0
        Expires: 0

        "#,
    );

    let sip_msg = parse(&msg);

    assert!(sip_msg.is_request());
    assert_eq!(sip_msg.version(), "2.0");
    assert_eq!(sip_msg.method(), Some("REGISTER"));
    assert_eq!(sip_msg.headers.len(), 14);
    assert_eq!(sip_msg.headers.cseq().unwrap().seq, 1);
    assert_eq!(sip_msg.headers.max_forwards(), Some(70));
    assert_eq!(sip_msg.headers.content_length(), Some(0));
    assert!(sip_msg.content.is_empty());

    let contact = &sip_msg.headers.contact()[0];
    assert_eq!(contact.params.len(), 8);
    assert_eq!(contact.params.value("expires"), Some("600000"));
    assert_eq!(
        contact.params.value("+sip.instance"),
        Some("\"<urn:gsma:imei:12345678-023451-0>\"")
    );

    let auth = &sip_msg.header("authorization").and_then(HeaderValue::as_auth).unwrap()[0];
    assert_eq!(auth.scheme.as_deref(), Some("Digest"));
    assert_eq!(auth.params.len(), 5);
    assert_eq!(
        auth.get_unquoted("realm").as_deref(),
        Some("ims.mnc123.mcc123.3gppnetwork.org")
    );
}

#[test]
fn test_header_parsing_case() {
    let msg = prepare_msg(
        "
        METHOD irrelevant SIP/2.0
        vIa: SIP/2.0/TCP 127.0.0.1:51372;branch=4y479aZgQ6b15d63F;rport
        cseq: 65 SOMETHING
        mAx-ForwarDS: 11

        ",
    );

    let sip_msg = parse(&msg);

    assert_eq!(sip_msg.headers.len(), 3);
    assert!(!sip_msg.headers.via().is_empty());
    assert_eq!(sip_msg.headers.cseq().unwrap().seq, 65);
    assert_eq!(sip_msg.headers.max_forwards(), Some(11));
}

#[test]
fn test_header_parsing_spaces() {
    let msg = prepare_msg(
        "
        METHOD irrelevant SIP/2.0
        Via     : SIP/2.0/TCP
            127.0.0.1:51372;branch=4y479aZgQ6b15d63F;rport
        cseq: 65
          SOMETHING
        Max-Forwards  : 011
        To     : sip:vivekg@chair-dnrc.example.com ;   tag    = 1918181833n

        ",
    );

    let sip_msg = parse(&msg);

    assert_eq!(sip_msg.headers.len(), 4);
    let via = &sip_msg.headers.via()[0];
    assert_eq!(via.protocol, "TCP");
    assert_eq!(via.host, "127.0.0.1");
    let cseq = sip_msg.headers.cseq().unwrap();
    assert_eq!(cseq.seq, 65);
    assert_eq!(cseq.method, "SOMETHING");
    assert_eq!(sip_msg.headers.max_forwards(), Some(11));
    assert_eq!(sip_msg.headers.to().unwrap().tag(), Some("1918181833n"));
}

#[test]
fn test_multiline_headers() {
    let msg = prepare_msg(
        "
        METHOD irrelevant SIP/2.0
        Max-Forwards: 1257
        To:
           sip:vivekg@chair-dnrc.example.com ;   tag    = 1918181833n
        CSeq: 42 HI
        Route:
         <sip:127.0.0.1:5060;lr>

        ",
    );

    let sip_msg = parse(&msg);

    assert_eq!(sip_msg.headers.len(), 4);
    assert_eq!(sip_msg.headers.cseq().unwrap().seq, 42);
    assert_eq!(sip_msg.headers.max_forwards(), Some(1257));
    assert_eq!(sip_msg.headers.to().unwrap().tag(), Some("1918181833n"));
    let route_uri = sip_msg.headers.route()[0].uri.parsed().unwrap();
    assert_eq!(route_uri.params.get("lr"), Some(None));
}

#[test]
fn test_folded_value_matches_single_line() {
    let folded = parse("OPTIONS sip:x SIP/2.0\r\nTo:\r\n   <sip:a@b>\r\n   ;tag=1\r\n\r\n");
    let single = parse("OPTIONS sip:x SIP/2.0\r\nTo: <sip:a@b>;tag=1\r\n\r\n");
    assert_eq!(folded.headers, single.headers);
}

#[test]
fn test_via_header_parsing() {
    let sip_msg = parse(&prepare_msg(
        "
        METHOD irrelevant SIP/2.0
        Via: SIP/2.0/TCP 127.0.0.1:51372;branch=4y479aZgQ6b15d63F;rport

        ",
    ));

    assert!(sip_msg.is_request());
    assert_eq!(sip_msg.headers.len(), 1);
    let via = &sip_msg.headers.via()[0];
    assert_eq!(via.protocol, "TCP");
    assert_eq!(via.host, "127.0.0.1");
    assert_eq!(via.port, Some(51372));
    assert_eq!(via.params.len(), 2);
    assert_eq!(via.branch(), Some("4y479aZgQ6b15d63F"));
    assert_eq!(via.params.get("rport"), Some(None));
}

#[test]
fn test_route_header_parsing() {
    let sip_msg = parse(&prepare_msg(
        "
        METHOD irrelevant SIP/2.0
        Route: <sip:127.0.0.1:5060;lr>

        ",
    ));

    assert_eq!(sip_msg.headers.len(), 1);
    let route = &sip_msg.headers.route()[0];
    let uri = route.uri.parsed().unwrap();
    assert_eq!(uri.scheme, "sip");
    assert_eq!(uri.user, None);
    assert_eq!(uri.password, None);
    assert_eq!(uri.host, "127.0.0.1");
    assert_eq!(uri.port, Some(5060));
    assert!(uri.is_loose_routing());
    assert!(route.params.is_empty());
}

#[test]
fn test_multiroute_header_parsing() {
    let sip_msg = parse(&prepare_msg(
        "
        METHOD irrelevant SIP/2.0
        Route: <sip:10.0.0.1:5061;lr>
        Route: <sip:uuu:ppp@127.0.0.1:5060;aaaa>

        ",
    ));

    assert_eq!(sip_msg.headers.len(), 1);
    let routes = sip_msg.headers.route();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].uri.parsed().unwrap().host, "10.0.0.1");

    let second = routes[1].uri.parsed().unwrap();
    assert_eq!(second.scheme, "sip");
    assert_eq!(second.user.as_deref(), Some("uuu"));
    assert_eq!(second.password.as_deref(), Some("ppp"));
    assert_eq!(second.host, "127.0.0.1");
    assert_eq!(second.port, Some(5060));
    assert_eq!(second.params.len(), 1);
    assert_eq!(second.params.get("aaaa"), Some(None));
    assert!(routes[1].params.is_empty());
}

#[test]
fn test_two_route_lines_equal_one_joined_line() {
    let separate = parse("OPTIONS sip:x SIP/2.0\r\nRoute: <sip:a;lr>\r\nRoute: <sip:b;lr>\r\n\r\n");
    let joined = parse("OPTIONS sip:x SIP/2.0\r\nRoute: <sip:a;lr>, <sip:b;lr>\r\n\r\n");
    assert_eq!(separate.headers.route(), joined.headers.route());
    assert_eq!(separate.to_string(), joined.to_string());
}

#[test]
fn test_route_with_no_port() {
    let sip_msg = parse(&prepare_msg(
        "
        METHOD irrelevant SIP/2.0
        Route: <sip:services.example.com;lr;unknownwith=value;unknown-no-value>

        ",
    ));

    assert_eq!(sip_msg.headers.len(), 1);
    let uri = sip_msg.headers.route()[0].uri.parsed().unwrap();
    assert_eq!(uri.port, None);
    assert_eq!(uri.params.value("unknownwith"), Some("value"));
}

// RFC 4475 section 3.1.1.1, "A Short Tortuous INVITE"
#[test]
fn test_tortuous_invite_parsing() {
    init_tracing();
    let msg = prepare_msg(
        r#"
        INVITE sip:vivekg@chair-dnrc.example.com;unknownparam SIP/2.0
        TO :
         sip:vivekg@chair-dnrc.example.com ;   tag    = 1918181833n
        from   : "J Rosenberg \\\""         <sip:jdrosen@example.com>
          ;
          tag = 98asjd8
        MaX-fOrWaRdS: 0068
        Call-ID: wsinv.ndaksdj@192.0.2.1
        Content-Length   : 150
        cseq: 0009
          INVITE
        Via  : SIP  /   2.0
         /UDP
            192.0.2.2;branch=390skdjuw
        s :
        NewFangledHeader:   newfangled value
         continued newfangled value
        UnknownHeaderWithUnusualValue: ;;,,;;,;
        Content-Type: application/sdp
        Route:
         <sip:services.example.com;lr;unknownwith=value;unknown-no-value>
        v:  SIP  / 2.0  / TCP     spindle.example.com   ;
          branch  =   z9hG4bK9ikj8  ,
         SIP  /    2.0   / UDP  192.168.255.111   ; branch=
         z9hG4bK30239
        m:"Quoted string \"\"" <sip:jdrosen@example.com> ; newparam =
                newvalue ;
          secondparam ; q = 0.33

        v=0
        o=mhandley 29739 7272939 IN IP4 192.0.2.3
        s=-
        c=IN IP4 192.0.2.4
        t=0 0
        m=audio 49217 RTP/AVP 0 12
        m=video 3227 RTP/AVP 31
        a=rtpmap:31 LPC
    "#,
    );

    let sip_msg = parse(&msg);

    assert_eq!(sip_msg.method(), Some("INVITE"));
    // Via is declared twice
    assert_eq!(sip_msg.headers.len(), 13);

    let vias = sip_msg.headers.via();
    assert_eq!(vias.len(), 3);
    assert_eq!(vias[0].protocol, "UDP");
    assert_eq!(vias[1].protocol, "TCP");
    assert_eq!(vias[1].branch(), Some("z9hG4bK9ikj8"));
    assert_eq!(vias[2].protocol, "UDP");
    assert_eq!(vias[2].branch(), Some("z9hG4bK30239"));

    let contact = &sip_msg.headers.contact()[0];
    assert_eq!(contact.name.as_deref(), Some(r#""Quoted string \"\"""#));
    assert_eq!(contact.params.value("q"), Some("0.33"));
    assert_eq!(contact.params.value("newparam"), Some("newvalue"));
    assert_eq!(contact.params.get("secondparam"), Some(None));

    let from = sip_msg.headers.from().unwrap();
    assert_eq!(from.tag(), Some("98asjd8"));
    assert_eq!(from.display_name().as_deref(), Some(r#"J Rosenberg \""#));

    assert_eq!(sip_msg.headers.max_forwards(), Some(68));
    assert_eq!(sip_msg.headers.cseq().unwrap().seq, 9);
    assert_eq!(sip_msg.header("subject").and_then(HeaderValue::as_text), Some(""));
    assert!(sip_msg.content.starts_with("v=0\r\n"));
    assert!(sip_msg.content.ends_with("a=rtpmap:31 LPC\r\n"));
}

#[test]
fn test_response_start_line() {
    let msg = parse("SIP/2.0 180 Ringing Now\r\nCSeq: 1 INVITE\r\n\r\n");
    assert!(msg.is_response());
    assert_eq!(msg.status(), Some(180));
    assert_eq!(msg.reason(), Some("Ringing Now"));
}

#[test]
fn test_generic_header_repeats_are_comma_joined() {
    let msg = parse("OPTIONS sip:x SIP/2.0\r\nSupported: path\r\nSupported: gruu\r\n\r\n");
    assert_eq!(msg.header("supported").and_then(HeaderValue::as_text), Some("path,gruu"));
}

#[test]
fn test_contact_wildcard() {
    let msg = parse("REGISTER sip:x SIP/2.0\r\nContact: *\r\nExpires: 0\r\n\r\n");
    assert!(msg.header("contact").unwrap().is_wildcard());
    assert!(msg.to_string().contains("\r\nContact: *\r\n"));
}

#[test]
fn test_contact_wildcard_with_addresses_rejected() {
    let err = "REGISTER sip:x SIP/2.0\r\nContact: *\r\nContact: <sip:a@b>\r\n\r\n"
        .parse::<SipMessage>()
        .unwrap_err();
    assert_eq!(err.line(), Some(3));
    assert!(matches!(err.root(), Error::MalformedAor(_)), "{err:?}");
}

#[test]
fn test_header_errors_carry_line_and_name() {
    let err = "OPTIONS sip:x SIP/2.0\r\nCall-ID: a\r\nMax-Forwards: lots\r\n\r\n"
        .parse::<SipMessage>()
        .unwrap_err();
    assert_eq!(err.line(), Some(3));
    assert!(err.to_string().contains("max-forwards"), "{err}");

    let err = "OPTIONS sip:x SIP/2.0\r\nNo colon here\r\n\r\n".parse::<SipMessage>().unwrap_err();
    assert!(matches!(err.root(), Error::MalformedHeader { line: 2, .. }), "{err:?}");

    let err = "OPTIONS sip:x SIP/2.0\r\nRoute: <sip:a;lr> junk\r\n\r\n".parse::<SipMessage>().unwrap_err();
    assert!(matches!(err.root(), Error::TrailingData { .. }), "{err:?}");
}

#[test]
fn test_neither_request_nor_response() {
    let err = "hello world\r\n\r\n".parse::<SipMessage>().unwrap_err();
    assert!(matches!(err, Error::MalformedMessage(_)));
}
