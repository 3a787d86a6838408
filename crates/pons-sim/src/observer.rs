//! `SimObserver` — progress and data-collection callbacks invoked by
//! [`crate::Simulator::run`]. Every method has a no-op default so an
//! implementor only overrides what it needs.
//!
//! `pons-sim` never depends on `pons-output`: a [`SimEvent`] stream and the
//! chunk/end-of-run hooks are everything `pons-output`'s
//! `SimOutputObserver` needs to write the structured event log and
//! aggregate its own copy of the statistics.

use pons_core::{NodeId, SimTime};
use pons_router::RouterEvent;

use crate::stats::DerivedStats;

/// One notable occurrence during a run, timestamped by [`crate::Simulator`]
/// at the instant it happened.
#[derive(Clone, Debug)]
pub enum SimEvent {
    /// A router-level occurrence (reception, duplicate, delivery, drop,
    /// forward, abort, peer discovery) at `node`.
    Router { node: NodeId, event: RouterEvent },
    /// An application at `node` was handed a delivered message on `service`.
    AppDeliver { node: NodeId, service: u16 },
    /// An application at `node` originated a message to `to` on `service`.
    AppSend { node: NodeId, to: NodeId, service: u16 },
}

/// Callbacks invoked by [`crate::Simulator::run`] at key points in the
/// chunked pump loop.
pub trait SimObserver {
    /// Called once for every [`SimEvent`], in the order it occurred.
    fn on_event(&mut self, _now: SimTime, _event: &SimEvent) {}

    /// Called at every chunk boundary (`config.chunk_secs` apart), after
    /// that chunk's events have all been delivered via `on_event`.
    fn on_chunk(&mut self, _now: SimTime) {}

    /// Called once after the run stops, normally or via abort, with the
    /// final derived statistics.
    fn on_sim_end(&mut self, _now: SimTime, _stats: &DerivedStats) {}
}

/// A [`SimObserver`] that does nothing. Use when `run` is wanted without
/// progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
