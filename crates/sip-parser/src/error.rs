use thiserror::Error;

/// A type alias for handling `Result`s with `Error`
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing, building or serializing messages
#[derive(Error, Debug)]
pub enum Error {
    /// The envelope could not be recognized: missing header/body separator,
    /// or a start line that is neither a request nor a response
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// A header line has no `name: value` split, or an integer header holds
    /// something that is not a number
    #[error("Malformed header '{name}' on line {line}: {reason}")]
    MalformedHeader {
        line: usize,
        name: String,
        reason: String,
    },

    /// Invalid SIP URI
    #[error("Malformed URI: {0}")]
    MalformedUri(String),

    /// Invalid address-of-record (name-addr or addr-spec)
    #[error("Malformed address: {0}")]
    MalformedAor(String),

    /// Invalid Via entry
    #[error("Malformed Via: {0}")]
    MalformedVia(String),

    /// Invalid CSeq value
    #[error("Malformed CSeq: {0}")]
    MalformedCseq(String),

    /// Missing scheme in a WWW-Authenticate / Authorization style header
    #[error("Malformed authentication header: {0}")]
    MalformedAuth(String),

    /// A header was routed to the multi-value path but has no list parser
    #[error("Don't know how to process header '{0}' as a multi-value header")]
    UnsupportedHeaderCombination(String),

    /// A list header left text behind after its last entry
    #[error("Leftover data found after processing '{header}' header: {remainder:?}")]
    TrailingData { header: String, remainder: String },

    /// A sub-grammar failure, tagged with the logical line and header it occurred in
    #[error("Line {line}, header '{name}': {source}")]
    Header {
        line: usize,
        name: String,
        #[source]
        source: Box<Error>,
    },

    /// Structured construction got contradictory or missing fields
    #[error("Invalid build: {0}")]
    InvalidBuild(String),

    /// SDP field order or field value problem
    #[error("SDP error on line {line}: {reason}")]
    SdpFormat { line: usize, reason: String },

    /// MSRP framing problem
    #[error("{0}")]
    MsrpFormat(String),

    /// CPIM framing problem
    #[error("{0}")]
    CpimFormat(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Attaches the logical line number and header name to a sub-parser error.
    ///
    /// Errors that already carry that context are only completed, not wrapped twice.
    pub fn in_header(self, line: usize, name: &str) -> Self {
        match self {
            Error::MalformedHeader { line: 0, name: _, reason } => Error::MalformedHeader {
                line,
                name: name.to_string(),
                reason,
            },
            err @ (Error::MalformedHeader { .. } | Error::Header { .. }) => err,
            other => Error::Header {
                line,
                name: name.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Returns the underlying error, looking through header context wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Header { source, .. } => source.root(),
            other => other,
        }
    }

    /// Line number the error was reported on, when known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::MalformedHeader { line, .. } | Error::Header { line, .. } if *line > 0 => {
                Some(*line)
            }
            Error::SdpFormat { line, .. } if *line > 0 => Some(*line),
            _ => None,
        }
    }
}
