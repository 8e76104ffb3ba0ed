//! # SIP Message Types
//!
//! Value types produced by the parsers and consumed by the serializer.
//!
//! - [`SipMessage`] and [`StartLine`] - the request or response envelope
//! - [`Headers`] and [`HeaderValue`] - ordered header map and typed values
//! - [`Uri`] and [`UriRef`] - SIP URIs, parsed or kept as text
//! - [`Aor`] - display name, URI and parameters of an address header
//! - [`Via`], [`CSeq`], [`AuthHeader`] - structured header values
//! - [`Params`] - ordered `;name=value` parameter lists

pub mod address;
pub mod auth;
pub mod cseq;
pub mod header;
pub mod param;
pub mod sip_message;
pub mod uri;
pub mod via;

pub use address::Aor;
pub use auth::AuthHeader;
pub use cseq::CSeq;
pub use header::{HeaderKind, HeaderValue, Headers};
pub use param::Params;
pub use sip_message::{SipMessage, StartLine};
pub use uri::{Uri, UriRef};
pub use via::Via;
