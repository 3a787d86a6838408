//! JSON statistics export.
//!
//! Flattens the net-level counters, the routing-level counters, and the
//! four derived ratios into one JSON object, nothing added.

use serde::Serialize;

use pons_sim::{DerivedStats, NetStats, RoutingStats};

use crate::error::OutputResult;

/// The full statistics payload for one run: both raw counter buckets plus
/// the derived averages, as a single serialisable object.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct StatsExport {
    pub net: NetStatsExport,
    pub routing: RoutingStatsExport,
    pub derived: DerivedStatsExport,
}

#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct NetStatsExport {
    pub tx: u64,
    pub rx: u64,
    pub drop: u64,
    pub loss: u64,
}

#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct RoutingStatsExport {
    pub created: u64,
    pub delivered: u64,
    pub dropped: u64,
    pub hops: u64,
    pub latency: f64,
    pub started: u64,
    pub relayed: u64,
    pub removed: u64,
    pub aborted: u64,
    pub dups: u64,
}

#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct DerivedStatsExport {
    pub latency_avg: f64,
    pub hops_avg: f64,
    pub delivery_prob: f64,
    pub overhead_ratio: f64,
}

impl From<NetStats> for NetStatsExport {
    fn from(s: NetStats) -> Self {
        NetStatsExport { tx: s.tx, rx: s.rx, drop: s.drop, loss: s.loss }
    }
}

impl From<RoutingStats> for RoutingStatsExport {
    fn from(s: RoutingStats) -> Self {
        RoutingStatsExport {
            created: s.created,
            delivered: s.delivered,
            dropped: s.dropped,
            hops: s.hops,
            latency: s.latency,
            started: s.started,
            relayed: s.relayed,
            removed: s.removed,
            aborted: s.aborted,
            dups: s.dups,
        }
    }
}

impl From<DerivedStats> for DerivedStatsExport {
    fn from(s: DerivedStats) -> Self {
        DerivedStatsExport {
            latency_avg: s.latency_avg,
            hops_avg: s.hops_avg,
            delivery_prob: s.delivery_prob,
            overhead_ratio: s.overhead_ratio,
        }
    }
}

impl StatsExport {
    pub fn new(net: NetStats, routing: RoutingStats, derived: DerivedStats) -> Self {
        StatsExport { net: net.into(), routing: routing.into(), derived: derived.into() }
    }

    /// Build the export directly from a run's raw stats, deriving the
    /// averages itself.
    pub fn from_raw(net: NetStats, routing: RoutingStats) -> Self {
        let derived = routing.derived();
        StatsExport::new(net, routing, derived)
    }

    pub fn to_json(&self) -> OutputResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string_pretty(&self) -> OutputResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
