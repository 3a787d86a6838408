//! Events surfaced by router reception/forwarding.
//!
//! `pons-router` never depends on `pons-output` — statistics and the event
//! log both live above it, in `pons-sim`/`pons-output`. Every method that can
//! produce a notable occurrence takes an `on_event` callback instead, so the
//! facade decides what to do with each one (fold into `RoutingStats`, write
//! an event-log line, both, or neither in a test).

use pons_core::NodeId;
use pons_store::DropReason;

#[derive(Clone, Debug, PartialEq)]
pub enum RouterEvent {
    /// A message (bundle or control packet) arrived from `from`.
    Rx { from: NodeId, msg_id: String },
    /// `msg_id` was already in history; dropped as a duplicate.
    Dup { msg_id: String },
    /// `msg_id` reached its destination at this node.
    Delivered { msg_id: String, hops: u32, latency: f64 },
    /// `msg_id` was accepted into the local store.
    Stored { msg_id: String },
    /// `msg_id` left the local store for a reason other than a successful
    /// policy handoff (expired, evicted, or handed to an application).
    Dropped { msg_id: String, reason: DropReason },
    /// `msg_id` was successfully handed off to `peer`.
    Forwarded { msg_id: String, peer: NodeId },
    /// A scheduled transmission of `msg_id` to `peer` failed (contact ended,
    /// loss roll, etc.); the history entry for this pair was retracted so a
    /// later contact can retry.
    Aborted { msg_id: String, peer: NodeId },
    /// `peer` was seen for the first time this scan.
    PeerDiscovered { peer: NodeId },
}
