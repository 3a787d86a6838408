//! `Contact` — one scheduled or fixed link between a pair of nodes.
//!
//! A static graph edge is just a `Contact` with `fixed = true` and an
//! infinite timespan, so both representations share this one type.

use pons_core::NodeId;

/// A per-byte floor used in place of a division by zero when a contact's
/// bandwidth is `0` (meaning "unbounded" rather than "no link").
pub const UNBOUNDED_BW_SECS_PER_BYTE: f64 = 0.000_005;

/// A scheduled or fixed link between two nodes.
///
/// `timespan.1 < 0.0` marks a fixed contact: always active, no scheduled end.
/// Equality is by value — a `Contact` carries no identity beyond its fields.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Contact {
    pub timespan: (f64, f64),
    pub nodes: (NodeId, NodeId),
    /// Bandwidth in bits per second. `0` means unbounded.
    pub bandwidth_bps: u64,
    pub loss: f64,
    pub delay_secs: f64,
    pub jitter_secs: f64,
    pub fixed: bool,
    /// Informational only (ION `range` lines, light-seconds converted to
    /// metres); never consulted by routing or loss/tx-time calculations.
    pub range_m: Option<f64>,
}

impl Contact {
    pub fn scheduled(
        timespan: (f64, f64),
        nodes: (NodeId, NodeId),
        bandwidth_bps: u64,
        loss: f64,
        delay_secs: f64,
        jitter_secs: f64,
    ) -> Self {
        Contact {
            timespan,
            nodes,
            bandwidth_bps,
            loss,
            delay_secs,
            jitter_secs,
            fixed: false,
            range_m: None,
        }
    }

    pub fn fixed(
        nodes: (NodeId, NodeId),
        bandwidth_bps: u64,
        loss: f64,
        delay_secs: f64,
        jitter_secs: f64,
    ) -> Self {
        Contact {
            timespan: (0.0, -1.0),
            nodes,
            bandwidth_bps,
            loss,
            delay_secs,
            jitter_secs,
            fixed: true,
            range_m: None,
        }
    }

    /// `true` if `time` falls within this contact's active window.
    #[inline]
    pub fn active_at(&self, time: f64) -> bool {
        self.fixed || (time >= self.timespan.0 && time <= self.timespan.1)
    }

    /// `true` if this contact's unordered node pair matches `(a, b)`.
    #[inline]
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.nodes.0 == a && self.nodes.1 == b) || (self.nodes.0 == b && self.nodes.1 == a)
    }

    /// Identity key used to de-duplicate contacts for the same pair, per
    /// `NetworkPlan`'s idempotent-insertion rule: `(nodes, fixed)`, with the
    /// pair normalized so insertion order doesn't matter.
    pub fn dedup_key(&self) -> ((NodeId, NodeId), bool) {
        let (a, b) = self.nodes;
        let normalized = if a <= b { (a, b) } else { (b, a) };
        (normalized, self.fixed)
    }
}
