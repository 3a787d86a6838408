//! The closed set of event-log categories.

use std::fmt;
use std::str::FromStr;

/// One of the nine wire-format categories. Closed set — `pons-output` never
/// invents a tenth.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Config,
    Net,
    Router,
    Store,
    App,
    Link,
    Move,
    Peers,
    Stats,
}

impl EventCategory {
    pub const ALL: [EventCategory; 9] = [
        EventCategory::Config,
        EventCategory::Net,
        EventCategory::Router,
        EventCategory::Store,
        EventCategory::App,
        EventCategory::Link,
        EventCategory::Move,
        EventCategory::Peers,
        EventCategory::Stats,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventCategory::Config => "CONFIG",
            EventCategory::Net => "NET",
            EventCategory::Router => "ROUTER",
            EventCategory::Store => "STORE",
            EventCategory::App => "APP",
            EventCategory::Link => "LINK",
            EventCategory::Move => "MOVE",
            EventCategory::Peers => "PEERS",
            EventCategory::Stats => "STATS",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by [`FromStr`] for an unrecognised category token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event category {:?}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for EventCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONFIG" => Ok(EventCategory::Config),
            "NET" => Ok(EventCategory::Net),
            "ROUTER" => Ok(EventCategory::Router),
            "STORE" => Ok(EventCategory::Store),
            "APP" => Ok(EventCategory::App),
            "LINK" => Ok(EventCategory::Link),
            "MOVE" => Ok(EventCategory::Move),
            "PEERS" => Ok(EventCategory::Peers),
            "STATS" => Ok(EventCategory::Stats),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}
