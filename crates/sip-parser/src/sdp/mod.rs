//! # Session Description Protocol
//!
//! Parser for SDP bodies (RFC 4566) as carried in SIP INVITE, UPDATE and
//! 200 OK messages. Parsing is strict about field order and lenient about
//! field content: most values are kept as written.
//!
//! The result separates the three levels of an SDP description:
//!
//! - [`SessionDescription`] - session-wide fields (`v o s i u e p c b z k a`)
//! - [`TimeDescription`] - each `t=` line with its `r=` repeats
//! - [`MediaDescription`] - each `m=` line with its `i c b k a` fields

mod parser;
mod types;

pub use parser::parse_sdp;
pub use types::{
    typed_time_seconds, Attribute, ConnectionData, MediaDescription, MediaField, Origin,
    RepeatTimes, SdpMessage, SessionDescription, TimeDescription, Timing,
};
