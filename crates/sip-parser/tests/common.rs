// Common test utilities for sip-parser
#![allow(dead_code)]

use std::sync::Once;

use sip_parser::SipMessage;

static TRACING: Once = Once::new();

/// Installs a tracing subscriber that writes through the test harness.
/// Set `RUST_LOG=trace` to see the header dispatch.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Turns an indented multi-line literal into a wire message.
///
/// A leading newline is dropped, the common indentation of non-blank lines
/// is removed, whitespace-only lines become empty and every line break is
/// written as CRLF.
pub fn prepare_msg(text: &str) -> String {
    let text = text.strip_prefix('\n').unwrap_or(text);
    let lines: Vec<&str> = text.split('\n').collect();

    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| if line.trim().is_empty() { "" } else { &line[indent..] })
        .collect::<Vec<_>>()
        .join("\r\n")
}

/// Parses a message, panicking with the error on failure.
pub fn parse(text: &str) -> SipMessage {
    text.parse::<SipMessage>()
        .unwrap_or_else(|e| panic!("Failed to parse test message: {}\n{}", e, text))
}

/// Asserts that writing a parsed message and parsing it again is stable:
/// the second rendering equals the first one.
pub fn assert_roundtrip(text: &str) -> String {
    let first = parse(text).to_string();
    let second = parse(&first).to_string();
    assert_eq!(first, second, "Rendering changed on second pass for input:\n{}", text);
    first
}
