//! SIP message parser implementation
//!
//! This module contains the grammars for SIP messages and the header values
//! that need structure: URIs, addresses, Via, CSeq and authentication
//! headers. All parsers use the nom parser combinator library and work on
//! `&str`.

use nom::IResult;

// Primitive grammar helpers
mod quoted;
mod token;
mod utils;
mod whitespace;

// Header value grammars
mod address;
mod auth;
mod cseq;
mod multi;
mod params;
mod uri;
mod via;

// MIME-style header blocks of MSRP and CPIM
#[cfg(any(feature = "msrp", feature = "cpim"))]
mod mime;

// Envelope
mod message;
mod request;
mod response;

// Type alias for parser result
pub(crate) type ParseResult<'a, O> = IResult<&'a str, O>;

pub use address::{parse_aor, parse_aor_with_uri};
pub use auth::{parse_auth_params, parse_auth_with_scheme};
pub use cseq::parse_cseq;
pub use message::parse_message;
pub use multi::parse_multi;
pub use params::parse_params;
pub use quoted::unquote;
pub use uri::parse_uri;
pub use utils::{percent_decode, percent_encode};
pub use via::parse_via;

pub(crate) use token::is_token_char;

#[cfg(any(feature = "msrp", feature = "cpim"))]
pub(crate) use mime::header_line;
