//! `RouterCore` — the reception/history/store substrate shared by every
//! forwarding policy.
//!
//! The full reception path (`_on_msg_received`), scan-driven peer tracking,
//! and history bookkeeping are implemented once here and reused by every
//! `RouterKind` variant in [`crate::kind`], rather than duplicated per
//! policy.

use std::collections::{HashMap, HashSet};

use pons_core::{NodeId, SimTime};
use pons_message::Message;
use pons_store::{DropReason, MessageStore};

use crate::event::RouterEvent;

/// What happened when a just-received message was handed to
/// [`RouterCore::receive`].
pub enum ReceptionOutcome {
    /// Already known (present in history); dropped without further action.
    Duplicate,
    /// Reached `msg.dst` at this node.
    DeliveredLocal { msg: Message },
    /// Not locally destined; the caller's `RouterKind` variant should now
    /// accept it into the store and run its forwarding policy.
    ToForward { msg: Message },
}

/// Per-node router state shared by every forwarding policy.
pub struct RouterCore {
    pub node_id: NodeId,
    /// Peers known as of the current scan, in discovery order.
    pub peers: Vec<NodeId>,
    /// `message unique_id -> peers already known to have (or been sent) it`.
    pub history: HashMap<String, HashSet<NodeId>>,
    pub store: MessageStore,
    /// How often, in simulated seconds, this router re-evaluates its
    /// neighbourhood. Informational here; the scan loop itself lives in
    /// `pons-sim`, which owns the scheduler.
    pub scan_interval: f64,
}

impl RouterCore {
    pub fn new(node_id: NodeId, capacity: u64, scan_interval: f64) -> Self {
        RouterCore {
            node_id,
            peers: Vec::new(),
            history: HashMap::new(),
            store: MessageStore::new(capacity),
            scan_interval,
        }
    }

    // ── Peer discovery ──────────────────────────────────────────────────

    /// Reset the peer set at the start of a HELLO-driven scan.
    pub fn begin_scan(&mut self) {
        self.peers.clear();
    }

    /// Record a peer seen via an incoming HELLO. Returns `true` if this peer
    /// is new since the last `begin_scan`.
    pub fn note_peer_seen(&mut self, peer: NodeId) -> bool {
        if self.peers.contains(&peer) {
            false
        } else {
            self.peers.push(peer);
            true
        }
    }

    /// Replace the peer set wholesale from the node's own neighbour set (the
    /// non-HELLO discovery mode, driven by `pons_node::Node::calc_neighbors`
    /// instead of control traffic). Returns the newly discovered peers.
    pub fn sync_peers_from_neighbors(&mut self, neighbors: Vec<NodeId>) -> Vec<NodeId> {
        let newly: Vec<NodeId> = neighbors.iter().copied().filter(|p| !self.peers.contains(p)).collect();
        self.peers = neighbors;
        newly
    }

    // ── History ──────────────────────────────────────────────────────────

    pub fn history_contains(&self, uid: &str) -> bool {
        self.history.contains_key(uid)
    }

    pub fn record_history(&mut self, uid: &str, peer: NodeId) {
        self.history.entry(uid.to_string()).or_default().insert(peer);
    }

    pub fn retract_history(&mut self, uid: &str, peer: NodeId) {
        if let Some(peers) = self.history.get_mut(uid) {
            peers.remove(&peer);
        }
    }

    // ── Reception path ──────────────────────────────────────────────────

    /// The shared reception path: duplicate suppression keyed on the
    /// message's whole history entry (not just this peer), hop counting, and
    /// local-delivery detection. Identical for every `RouterKind` variant.
    pub fn receive(
        &mut self,
        mut msg: Message,
        from: NodeId,
        now: SimTime,
        mut on_event: impl FnMut(RouterEvent),
    ) -> ReceptionOutcome {
        let uid = msg.unique_id();
        on_event(RouterEvent::Rx { from, msg_id: uid.clone() });

        if self.history_contains(&uid) {
            self.record_history(&uid, from);
            on_event(RouterEvent::Dup { msg_id: uid });
            return ReceptionOutcome::Duplicate;
        }

        self.record_history(&uid, from);
        msg.bump_hops();

        if msg.is_delivered_at(self.node_id) {
            let hops = msg.hops;
            let latency = now.since(msg.created);
            on_event(RouterEvent::Delivered { msg_id: uid, hops, latency });
            ReceptionOutcome::DeliveredLocal { msg }
        } else {
            ReceptionOutcome::ToForward { msg }
        }
    }

    // ── Store bookkeeping ───────────────────────────────────────────────

    pub fn store_message(&mut self, msg: Message, now: SimTime, mut on_event: impl FnMut(RouterEvent)) -> bool {
        let uid = msg.unique_id();
        let added = self.store.add(msg, now, |m, reason| {
            on_event(RouterEvent::Dropped { msg_id: m.unique_id(), reason });
        });
        if added {
            on_event(RouterEvent::Stored { msg_id: uid });
        }
        added
    }

    pub fn remove_message(&mut self, uid: &str, reason: DropReason, mut on_event: impl FnMut(RouterEvent)) -> bool {
        self.store.del(uid, reason, |m, r| {
            on_event(RouterEvent::Dropped { msg_id: m.unique_id(), reason: r });
        })
    }

    pub fn sweep_expired(&mut self, now: SimTime, mut on_event: impl FnMut(RouterEvent)) {
        self.store.sweep_expired(now, &mut |m, r| {
            on_event(RouterEvent::Dropped { msg_id: m.unique_id(), reason: r });
        });
    }

    /// Shared transmission-failure bookkeeping: retract the history entry so
    /// the pair can be retried on the next contact, and surface the event.
    /// Success is policy-specific (see `Router::on_tx_succeeded`).
    pub fn on_tx_failed(&mut self, uid: &str, peer: NodeId, mut on_event: impl FnMut(RouterEvent)) {
        self.retract_history(uid, peer);
        on_event(RouterEvent::Aborted { msg_id: uid.to_string(), peer });
    }
}
