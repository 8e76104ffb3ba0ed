use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::types::address::Aor;
use crate::types::cseq::CSeq;
use crate::types::header::HeaderValue;
use crate::types::sip_message::SipMessage;
use crate::types::uri::UriRef;
use crate::types::via::Via;

/// A fluent builder for SIP requests and responses.
///
/// Header values given as text are parsed exactly like header lines of a
/// received message. The first invalid value is remembered and reported by
/// [`build`](MessageBuilder::build), so calls can be chained freely.
///
/// # Example
///
/// ```rust
/// use sip_parser::MessageBuilder;
///
/// let request = MessageBuilder::invite("sip:bob@biloxi.com")
///     .via("pc33.atlanta.com", "UDP", Some("z9hG4bK776asdhds"))
///     .max_forwards(70)
///     .to("Bob", "sip:bob@biloxi.com", None)
///     .from("Alice", "sip:alice@atlanta.com", Some("1928301774"))
///     .call_id("a84b4c76e66710@pc33.atlanta.com")
///     .cseq(314159)
///     .content_type("application/sdp")
///     .body("v=0\r\n")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.headers.cseq().unwrap().method, "INVITE");
/// assert_eq!(request.headers.content_length(), Some(5));
/// ```
#[derive(Debug)]
pub struct MessageBuilder {
    message: SipMessage,
    error: Option<Error>,
}

impl MessageBuilder {
    /// Start a request with the given method and Request-URI
    pub fn request(method: impl Into<String>, uri: impl Into<UriRef>) -> Self {
        Self::from_message(SipMessage::request(method, uri))
    }

    /// Start a response with the given status code and reason phrase
    pub fn response(status: u16, reason: impl Into<String>) -> Self {
        Self::from_message(SipMessage::response(status, reason))
    }

    /// Continue building from an existing message
    pub fn from_message(message: SipMessage) -> Self {
        Self { message, error: None }
    }

    pub fn invite(uri: impl Into<UriRef>) -> Self {
        Self::request("INVITE", uri)
    }

    pub fn register(uri: impl Into<UriRef>) -> Self {
        Self::request("REGISTER", uri)
    }

    pub fn options(uri: impl Into<UriRef>) -> Self {
        Self::request("OPTIONS", uri)
    }

    pub fn bye(uri: impl Into<UriRef>) -> Self {
        Self::request("BYE", uri)
    }

    pub fn ok() -> Self {
        Self::response(200, "OK")
    }

    pub fn trying() -> Self {
        Self::response(100, "Trying")
    }

    pub fn ringing() -> Self {
        Self::response(180, "Ringing")
    }

    fn record(&mut self, result: Result<()>) {
        if let Err(e) = result {
            tracing::debug!(error = %e, "builder rejected header value");
            self.error.get_or_insert(e);
        }
    }

    /// Add a header from its textual value, as if it were a received header line
    pub fn header(mut self, name: &str, value: &str) -> Self {
        let result = self.message.headers.add_from_str(name, value);
        self.record(result);
        self
    }

    /// Add an already typed header value, combining it with a previous
    /// occurrence the way repeated header lines are combined
    pub fn typed_header(mut self, name: &str, value: HeaderValue) -> Self {
        let result = self.message.headers.append(name, value);
        self.record(result);
        self
    }

    /// Keep the header as a key but leave it out of the serialized message
    pub fn suppress(mut self, name: &str) -> Self {
        self.message.headers.suppress(name);
        self
    }

    /// Add a From header with optional tag parameter
    pub fn from(self, display_name: &str, uri: &str, tag: Option<&str>) -> Self {
        let aor = address(display_name, uri, tag);
        self.typed_header("from", HeaderValue::Address(aor))
    }

    /// Add a To header with optional tag parameter
    pub fn to(self, display_name: &str, uri: &str, tag: Option<&str>) -> Self {
        let aor = address(display_name, uri, tag);
        self.typed_header("to", HeaderValue::Address(aor))
    }

    pub fn call_id(self, call_id: &str) -> Self {
        self.typed_header("call-id", HeaderValue::Text(call_id.to_string()))
    }

    /// Add a CSeq header. Requests use their own method; responses must use
    /// [`cseq_with_method`](MessageBuilder::cseq_with_method).
    pub fn cseq(mut self, seq: u32) -> Self {
        match self.message.method().map(str::to_string) {
            Some(method) => self.cseq_with_method(seq, method),
            None => {
                self.record(Err(Error::InvalidBuild(
                    "a response CSeq needs an explicit method".to_string(),
                )));
                self
            }
        }
    }

    pub fn cseq_with_method(self, seq: u32, method: impl Into<String>) -> Self {
        self.typed_header("cseq", HeaderValue::CSeq(CSeq::new(seq, method)))
    }

    /// Add a Via entry. `host` may carry a `:port` suffix.
    pub fn via(mut self, host: &str, transport: &str, branch: Option<&str>) -> Self {
        let (hostname, port) = match split_host_port(host) {
            Ok(parts) => parts,
            Err(e) => {
                self.record(Err(e));
                return self;
            }
        };

        let mut via = Via::new(transport, hostname, port);
        if let Some(branch) = branch {
            via = via.with_param("branch", Some(branch));
        }
        self.typed_header("via", HeaderValue::Via(vec![via]))
    }

    pub fn max_forwards(self, value: u32) -> Self {
        self.typed_header("max-forwards", HeaderValue::Integer(value))
    }

    /// Add a Contact entry
    pub fn contact(self, uri: &str, display_name: Option<&str>) -> Self {
        let mut aor = Aor::new(uri);
        if let Some(name) = display_name {
            aor = aor.with_name(quote_display_name(name));
        }
        self.typed_header("contact", HeaderValue::AddressList(vec![aor]))
    }

    pub fn content_type(self, content_type: &str) -> Self {
        self.typed_header("content-type", HeaderValue::Text(content_type.to_string()))
    }

    /// Set the body. Content-Length follows it when the message is built.
    pub fn body(mut self, content: impl Into<String>) -> Self {
        self.message.content = content.into();
        self
    }

    /// Finish the message, reporting the first invalid header value if any
    pub fn build(self) -> Result<SipMessage> {
        if let Some(e) = self.error {
            return Err(e);
        }
        let mut message = self.message;
        message.sync_content_length();
        Ok(message)
    }
}

// `[v6]:port`, `host:port` or a bare host. An unbracketed IPv6 literal has no
// port and is bracketed so the sent-by reads back as one host.
fn split_host_port(host: &str) -> Result<(Cow<'_, str>, Option<u16>)> {
    let separator = if host.starts_with('[') {
        host.find("]:").map(|i| i + 1)
    } else if host.matches(':').count() == 1 {
        host.find(':')
    } else if host.contains(':') {
        return Ok((Cow::Owned(format!("[{}]", host)), None));
    } else {
        None
    };

    match separator {
        Some(i) => {
            let port = host[i + 1..]
                .parse::<u16>()
                .map_err(|_| Error::MalformedVia(format!("invalid port in {:?}", host)))?;
            Ok((Cow::Borrowed(&host[..i]), Some(port)))
        }
        None => Ok((Cow::Borrowed(host), None)),
    }
}

fn quote_display_name(name: &str) -> String {
    let is_token_run = name
        .split(' ')
        .all(|word| !word.is_empty() && word.chars().all(crate::parser::is_token_char));
    if is_token_run {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

fn address(display_name: &str, uri: &str, tag: Option<&str>) -> Aor {
    let mut aor = Aor::new(uri);
    if !display_name.is_empty() {
        aor = aor.with_name(quote_display_name(display_name));
    }
    if let Some(tag) = tag {
        aor = aor.with_param("tag", Some(tag));
    }
    aor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_matches_parsed_text() {
        let built = MessageBuilder::register("sip:registrar.biloxi.com")
            .via("bobspc.biloxi.com:5060", "UDP", Some("z9hG4bKnashds7"))
            .max_forwards(70)
            .to("Bob", "sip:bob@biloxi.com", None)
            .from("Bob", "sip:bob@biloxi.com", Some("456248"))
            .call_id("843817637684230@998sdasdh09")
            .cseq(1826)
            .contact("sip:bob@192.0.2.4", None)
            .build()
            .unwrap();

        let text = "REGISTER sip:registrar.biloxi.com SIP/2.0\r\n\
                    Via: SIP/2.0/UDP bobspc.biloxi.com:5060;branch=z9hG4bKnashds7\r\n\
                    Max-Forwards: 70\r\n\
                    To: Bob <sip:bob@biloxi.com>\r\n\
                    From: Bob <sip:bob@biloxi.com>;tag=456248\r\n\
                    Call-ID: 843817637684230@998sdasdh09\r\n\
                    CSeq: 1826 REGISTER\r\n\
                    Contact: <sip:bob@192.0.2.4>\r\n\
                    Content-Length: 0\r\n\r\n";
        let parsed: SipMessage = text.parse().unwrap();
        assert_eq!(built.to_string(), parsed.to_string());
        assert_eq!(built.to_string(), text);
    }

    #[test]
    fn test_display_name_quoting() {
        assert_eq!(quote_display_name("Bob"), "Bob");
        assert_eq!(quote_display_name("Bob Smith"), "Bob Smith");
        assert_eq!(quote_display_name("Bob, Jr."), "\"Bob, Jr.\"");
        assert_eq!(quote_display_name("say \"hi\""), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_first_error_reported() {
        let err = MessageBuilder::ok()
            .header("cseq", "not a cseq")
            .header("content-length", "x")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MalformedCseq(_)));

        let err = MessageBuilder::ok().cseq(1).build().unwrap_err();
        assert!(matches!(err, Error::InvalidBuild(_)));
    }

    #[test]
    fn test_via_port_handling() {
        let msg = MessageBuilder::options("sip:x").via("[2001:db8::1]:5061", "tls", None).build().unwrap();
        let via = &msg.headers.via()[0];
        assert_eq!(via.host, "[2001:db8::1]");
        assert_eq!(via.port, Some(5061));

        let msg = MessageBuilder::options("sip:x").via("2001:db8::1", "UDP", None).build().unwrap();
        assert_eq!(msg.headers.via()[0].host, "[2001:db8::1]");
        let text = msg.to_string();
        assert!(text.contains("\r\nVia: SIP/2.0/UDP [2001:db8::1]\r\n"), "{text}");
        let reparsed: SipMessage = text.parse().unwrap();
        assert_eq!(reparsed.headers.via(), msg.headers.via());

        let msg = MessageBuilder::options("sip:x").via("host.example", "udp", None).build().unwrap();
        assert_eq!(msg.headers.via()[0].port, None);

        assert!(MessageBuilder::options("sip:x").via("host:99999", "udp", None).build().is_err());
    }

    #[test]
    fn test_body_sets_content_length() {
        let msg = MessageBuilder::response(200, "OK")
            .cseq_with_method(1, "MESSAGE")
            .header("content-length", "100")
            .body("hello")
            .build()
            .unwrap();
        assert_eq!(msg.headers.content_length(), Some(5));
    }

    #[test]
    fn test_suppress() {
        let msg = MessageBuilder::trying().header("Server", "x").suppress("server").build().unwrap();
        assert_eq!(msg.to_string(), "SIP/2.0 100 Trying\r\nContent-Length: 0\r\n\r\n");
    }
}
