//! `SimOutputObserver` — bridges `pons_sim::SimObserver` to an [`EventLogWriter`].
//!
//! This observer is where every event-logging site across the router, node,
//! and simulator collapses into one place: `pons-sim` only ever hands us a
//! [`SimEvent`] stream rather than writing its own log (see
//! `pons_sim::observer`'s module doc).

use std::io::Write;

use pons_router::RouterEvent;
use pons_sim::{DerivedStats, SimEvent, SimObserver};
use pons_store::DropReason;

use crate::category::EventCategory;
use crate::error::OutputResult;
use crate::event_log::EventLogWriter;

fn drop_reason_str(reason: DropReason) -> &'static str {
    match reason {
        DropReason::Expired => "expired",
        DropReason::Evicted => "evicted",
        DropReason::Delivered => "delivered",
        DropReason::PolicyHandoff => "policy_handoff",
    }
}

/// A [`SimObserver`] that writes every [`SimEvent`] to an [`EventLogWriter`]
/// as it occurs, using this category mapping:
/// reception/forwarding/duplicate/abort events are `ROUTER`, store
/// occupancy changes are `STORE`, new-peer events are `PEERS`, application
/// delivery/origination is `APP`. Write failures are stored rather than
/// returned, since `SimObserver` methods have no return value — check
/// [`take_error`][Self::take_error] after `sim.run()` returns.
pub struct SimOutputObserver<W: Write> {
    log: EventLogWriter<W>,
    last_error: Option<crate::error::OutputError>,
    last_stats: DerivedStats,
}

impl<W: Write> SimOutputObserver<W> {
    pub fn new(log: EventLogWriter<W>) -> Self {
        SimOutputObserver { log, last_error: None, last_stats: DerivedStats::default() }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<crate::error::OutputError> {
        self.last_error.take()
    }

    /// The derived statistics captured at the last `on_sim_end` call.
    pub fn last_stats(&self) -> DerivedStats {
        self.last_stats
    }

    /// Unwrap the inner writer (e.g. to inspect an in-memory sink in tests).
    pub fn into_log(self) -> EventLogWriter<W> {
        self.log
    }

    fn record(&mut self, ts: f64, category: EventCategory, payload: serde_json::Value) {
        let result = self.log.log(ts, category, payload);
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: Write> SimObserver for SimOutputObserver<W> {
    fn on_event(&mut self, now: pons_core::SimTime, event: &SimEvent) {
        let ts = now.as_secs();
        match event {
            SimEvent::Router { node, event } => {
                let node = node.0;
                match event {
                    RouterEvent::Rx { from, msg_id } => {
                        self.record(ts, EventCategory::Router, serde_json::json!({
                            "node": node, "from": from.0, "msg_id": msg_id, "kind": "rx",
                        }));
                    }
                    RouterEvent::Dup { msg_id } => {
                        self.record(ts, EventCategory::Router, serde_json::json!({
                            "node": node, "msg_id": msg_id, "kind": "dup",
                        }));
                    }
                    RouterEvent::Delivered { msg_id, hops, latency } => {
                        self.record(ts, EventCategory::Router, serde_json::json!({
                            "node": node, "msg_id": msg_id, "hops": hops, "latency": latency, "kind": "delivered",
                        }));
                    }
                    RouterEvent::Stored { msg_id } => {
                        self.record(ts, EventCategory::Store, serde_json::json!({
                            "node": node, "msg_id": msg_id, "kind": "stored",
                        }));
                    }
                    RouterEvent::Dropped { msg_id, reason } => {
                        self.record(ts, EventCategory::Store, serde_json::json!({
                            "node": node, "msg_id": msg_id, "reason": drop_reason_str(*reason), "kind": "dropped",
                        }));
                    }
                    RouterEvent::Forwarded { msg_id, peer } => {
                        self.record(ts, EventCategory::Router, serde_json::json!({
                            "node": node, "msg_id": msg_id, "peer": peer.0, "kind": "forwarded",
                        }));
                    }
                    RouterEvent::Aborted { msg_id, peer } => {
                        self.record(ts, EventCategory::Router, serde_json::json!({
                            "node": node, "msg_id": msg_id, "peer": peer.0, "kind": "aborted",
                        }));
                    }
                    RouterEvent::PeerDiscovered { peer } => {
                        self.record(ts, EventCategory::Peers, serde_json::json!({
                            "node": node, "peer": peer.0,
                        }));
                    }
                }
            }
            SimEvent::AppDeliver { node, service } => {
                self.record(ts, EventCategory::App, serde_json::json!({
                    "node": node.0, "service": service, "direction": "deliver",
                }));
            }
            SimEvent::AppSend { node, to, service } => {
                self.record(ts, EventCategory::App, serde_json::json!({
                    "node": node.0, "to": to.0, "service": service, "direction": "send",
                }));
            }
        }
    }

    fn on_sim_end(&mut self, now: pons_core::SimTime, stats: &DerivedStats) {
        self.last_stats = *stats;
        self.record(now.as_secs(), EventCategory::Stats, serde_json::json!({
            "latency_avg": stats.latency_avg,
            "hops_avg": stats.hops_avg,
            "delivery_prob": stats.delivery_prob,
            "overhead_ratio": stats.overhead_ratio,
        }));
        let result = self.log.flush();
        self.store_err(result);
    }
}
