//! Raw counters and the derived ratios computed from them.
//!
//! Two buckets: a wire-level counter set (`NetStats`, per send attempt) and
//! a message-level counter set (`RoutingStats`, per bundle). Owned by
//! [`crate::World`] and mutated only from inside scheduler tasks — no
//! synchronisation needed under the single-threaded cooperative model.

/// Wire-level counters, one update per [`pons_node::SendAttempt`] outcome.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NetStats {
    pub tx: u64,
    pub rx: u64,
    pub drop: u64,
    pub loss: u64,
}

/// Message-level counters, one update per [`pons_router::RouterEvent`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RoutingStats {
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

/// The four derived ratios, computed once at the end of a run (or on
/// abort) — never accumulated incrementally, so they never drift from the
/// raw counters. Every ratio is `0.0` when its denominator is `0`, avoiding
/// a NaN or panic on an empty run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DerivedStats {
    pub latency_avg: f64,
    pub hops_avg: f64,
    pub delivery_prob: f64,
    pub overhead_ratio: f64,
}

impl RoutingStats {
    pub fn derived(&self) -> DerivedStats {
        let delivered = self.delivered as f64;
        DerivedStats {
            latency_avg: if delivered > 0.0 { self.latency / delivered } else { 0.0 },
            hops_avg: if delivered > 0.0 { self.hops as f64 / delivered } else { 0.0 },
            delivery_prob: if self.created > 0 {
                delivered / self.created as f64
            } else {
                0.0
            },
            overhead_ratio: if delivered > 0.0 {
                (self.relayed as f64 - delivered) / delivered
            } else {
                0.0
            },
        }
    }
}
