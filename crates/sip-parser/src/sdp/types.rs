use serde::{Deserialize, Serialize};

/// Originator and session identifier (`o=`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    /// Username of the originator (often "-")
    pub username: String,
    pub session_id: String,
    /// Session version, kept as written
    pub session_version: String,
    /// Network type (typically "IN" for Internet)
    pub net_type: String,
    /// Address type ("IP4" or "IP6")
    pub addr_type: String,
    pub unicast_address: String,
}

/// Connection data (`c=`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionData {
    pub net_type: String,
    pub addr_type: String,
    /// Address, possibly with `/ttl` and `/count` suffixes
    pub connection_address: String,
}

/// Session start and stop times (`t=`), as NTP seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    pub start_time: String,
    pub stop_time: String,
}

/// Repeat times (`r=`). Values may use the compact `d`/`h`/`m`/`s` units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatTimes {
    pub repeat_interval: String,
    pub active_duration: String,
    pub offsets: Vec<String>,
}

impl RepeatTimes {
    pub fn interval_seconds(&self) -> Option<u64> {
        typed_time_seconds(&self.repeat_interval)
    }

    pub fn duration_seconds(&self) -> Option<u64> {
        typed_time_seconds(&self.active_duration)
    }

    /// Offsets in seconds, `None` if any of them is not a valid typed time
    pub fn offset_seconds(&self) -> Option<Vec<u64>> {
        self.offsets.iter().map(|o| typed_time_seconds(o)).collect()
    }
}

/// Converts a typed time (`7d`, `25h`, `90`) to seconds
pub fn typed_time_seconds(value: &str) -> Option<u64> {
    let (digits, multiplier) = match value.char_indices().last()? {
        (i, 'd') => (&value[..i], 86_400),
        (i, 'h') => (&value[..i], 3_600),
        (i, 'm') => (&value[..i], 60),
        (i, 's') => (&value[..i], 1),
        _ => (value, 1),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u64>().ok()?.checked_mul(multiplier)
}

/// Media announcement (`m=`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaField {
    /// Media type (e.g., "audio", "video", "application")
    pub media: String,
    pub port: u16,
    /// Taken from a `port/n` port field, 1 otherwise
    pub number_of_ports: u16,
    /// Transport protocol (e.g., "RTP/AVP")
    pub proto: String,
    /// Everything after the protocol, as written
    pub fmt: String,
}

impl MediaField {
    /// The individual media formats (payload types for RTP)
    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.fmt.split_whitespace()
    }
}

/// An `a=` line: `name:value` or a bare flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attribute {
    Value(String, String),
    Flag(String),
}

impl Attribute {
    pub fn name(&self) -> &str {
        match self {
            Attribute::Value(name, _) | Attribute::Flag(name) => name,
        }
    }

    /// The attribute value, `None` for flags
    pub fn value(&self) -> Option<&str> {
        match self {
            Attribute::Value(_, value) => Some(value),
            Attribute::Flag(_) => None,
        }
    }
}

/// A `t=` line and the `r=` lines that follow it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeDescription {
    pub timing: Timing,
    pub repeat_times: Vec<RepeatTimes>,
}

/// An `m=` line and the media-level fields that follow it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDescription {
    pub media: MediaField,
    pub media_title: Option<String>,
    pub connections: Vec<ConnectionData>,
    pub bandwidths: Vec<String>,
    pub encryption_key: Option<String>,
    pub attributes: Vec<Attribute>,
}

impl MediaDescription {
    pub(crate) fn new(media: MediaField) -> Self {
        Self {
            media,
            media_title: None,
            connections: Vec::new(),
            bandwidths: Vec::new(),
            encryption_key: None,
            attributes: Vec::new(),
        }
    }

    /// First attribute with the given name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }
}

/// Session-level fields, everything before the first `m=` except timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    /// Protocol version, always 0
    pub version: u8,
    pub origin: Origin,
    pub session_name: String,
    pub information: Option<String>,
    pub uri: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub connection: Option<ConnectionData>,
    pub bandwidths: Vec<String>,
    pub time_zones: Option<String>,
    pub encryption_key: Option<String>,
    pub attributes: Vec<Attribute>,
}

/// A parsed SDP body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdpMessage {
    pub session: SessionDescription,
    pub time_descriptions: Vec<TimeDescription>,
    pub media_descriptions: Vec<MediaDescription>,
}
