//! `LogRecord` — one parsed line of the event log wire format.

use crate::category::EventCategory;

/// One line of the event log: `"{ts:f} {CATEGORY} {json}\n"`.
#[derive(Clone, Debug, PartialEq)]
pub struct LogRecord {
    pub ts: f64,
    pub category: EventCategory,
    pub payload: serde_json::Value,
}

impl LogRecord {
    pub fn new(ts: f64, category: EventCategory, payload: serde_json::Value) -> Self {
        LogRecord { ts, category, payload }
    }

    /// Render as `"{ts} {CATEGORY} {json}"`, with no trailing newline (the
    /// writer appends it).
    pub fn to_line(&self) -> String {
        format!("{} {} {}", self.ts, self.category.as_str(), self.payload)
    }
}
