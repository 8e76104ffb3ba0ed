//! SIP message parsing and serialization
//!
//! This crate turns SIP message text into structured values and back. The
//! serializer is the inverse of the parser: parsing the output of a
//! stringified message yields the same message again.
//!
//! Alongside SIP it handles the formats that travel in SIP bodies and MSRP
//! sessions, each behind a Cargo feature that is enabled by default:
//!
//! - `sdp` - session descriptions ([`sdp::parse_sdp`])
//! - `msrp` - MSRP frames ([`msrp::parse_msrp`])
//! - `cpim` - CPIM wrapped messages ([`cpim::parse_cpim`])
//!
//! ```
//! use sip_parser::prelude::*;
//!
//! let text = "SIP/2.0 200 OK\r\nCSeq: 1 INVITE\r\nContent-Length: 0\r\n\r\n";
//! let msg: SipMessage = text.parse().unwrap();
//! assert_eq!(msg.status(), Some(200));
//! assert_eq!(msg.headers.cseq().unwrap().method, "INVITE");
//! assert_eq!(msg.to_string(), text);
//! ```

pub mod builder;
pub mod error;
pub mod json;
pub mod parser;
pub mod types;

#[cfg(feature = "cpim")]
pub mod cpim;
#[cfg(feature = "msrp")]
pub mod msrp;
#[cfg(feature = "sdp")]
pub mod sdp;

pub use builder::{MessageBuilder, MessageSpec};
pub use error::{Error, Result};
pub use json::SipJsonExt;
pub use parser::parse_message;
pub use types::{
    Aor, AuthHeader, CSeq, HeaderKind, HeaderValue, Headers, Params, SipMessage, StartLine, Uri,
    UriRef, Via,
};

/// Re-export of common types and functions
pub mod prelude {
    pub use crate::builder::{MessageBuilder, MessageSpec};
    pub use crate::error::{Error, Result};
    pub use crate::json::SipJsonExt;
    pub use crate::parser::{parse_aor, parse_message, parse_uri, parse_via};
    pub use crate::types::{
        Aor, AuthHeader, CSeq, HeaderValue, Headers, Params, SipMessage, StartLine, Uri, UriRef,
        Via,
    };

    #[cfg(feature = "cpim")]
    pub use crate::cpim::{parse_cpim, CpimMessage};
    #[cfg(feature = "msrp")]
    pub use crate::msrp::{parse_msrp, MsrpMessage};
    #[cfg(feature = "sdp")]
    pub use crate::sdp::{parse_sdp, SdpMessage};
}
