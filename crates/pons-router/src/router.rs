//! `Router` — one node's `RouterCore` substrate paired with its `RouterKind`
//! forwarding policy.
//!
//! The reception path and peer-scan bookkeeping are identical across all
//! six forwarding policies and live in [`crate::core::RouterCore`]; only
//! the forwarding decision and the tx-succeeded handoff cleanup differ, and
//! those differences are exactly what [`RouterKind`] switches on.

use pons_core::{NodeId, SimTime};
use pons_message::Message;
use pons_store::DropReason;

use crate::core::{ReceptionOutcome, RouterCore};
use crate::event::RouterEvent;
use crate::kind::RouterKind;

/// How a router discovers its peer set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanMode {
    /// Emit a `HELLO` control message at `scan_interval` and build the peer
    /// set from replies seen during the scan window.
    Hello,
    /// Read the peer set directly from the owning node's neighbour set —
    /// no control-traffic round trip.
    NeighborSync,
}

/// One outbound copy a forwarding decision produced: `msg` already carries
/// whatever per-copy metadata the policy assigned (e.g. a split copy count),
/// ready for the caller (`pons-sim`) to hand to `Node::send_plan`.
#[derive(Clone, Debug)]
pub struct ForwardPlan {
    pub peer: NodeId,
    pub msg: Message,
}

/// A fully assembled per-node router: shared substrate plus forwarding
/// policy.
pub struct Router {
    pub core: RouterCore,
    pub kind: RouterKind,
    pub scan_mode: ScanMode,
}

impl Router {
    pub fn new(node_id: NodeId, capacity: u64, scan_interval: f64, kind: RouterKind, scan_mode: ScanMode) -> Self {
        Router {
            core: RouterCore::new(node_id, capacity, scan_interval),
            kind,
            scan_mode,
        }
    }

    /// Seed a message newly originated at this node (by a generator or an
    /// application) with whatever metadata this policy requires before it
    /// is first stored.
    pub fn prepare_outgoing(&self, msg: &mut Message) {
        self.kind.prepare_outgoing(msg);
    }

    /// The full shared reception path (`_on_msg_received`): duplicate
    /// suppression, hop counting, local-delivery detection. On
    /// [`ReceptionOutcome::ToForward`], the message is additionally accepted
    /// into the local store here — every policy stores a message it isn't
    /// immediately and fully done with, even ones that delete it again after
    /// the next successful handoff.
    pub fn on_msg_received(&mut self, msg: Message, from: NodeId, now: SimTime, mut on_event: impl FnMut(RouterEvent)) -> ReceptionOutcome {
        let outcome = self.core.receive(msg, from, now, &mut on_event);
        if let ReceptionOutcome::ToForward { msg } = &outcome {
            self.core.store_message(msg.clone(), now, &mut on_event);
        }
        outcome
    }

    /// Decide which currently known peers the stored message `uid` should
    /// be forwarded to right now, mutating any policy-local per-message
    /// state (spray-and-wait's remaining copy count) in the same pass.
    pub fn plan_forwards(&mut self, uid: &str) -> Vec<ForwardPlan> {
        let Some(msg) = self.core.store.get(uid).cloned() else {
            return Vec::new();
        };
        let history = self.core.history.get(uid);
        let eligible: Vec<NodeId> = self
            .core
            .peers
            .iter()
            .copied()
            .filter(|p| history.map_or(true, |seen| !seen.contains(p)))
            .collect();

        let plans = self.plan_forwards_for_kind(uid, &msg, eligible);

        // Remember each peer a forward was scheduled to, right after
        // planning the send, so `eligible` excludes it on the next scan —
        // otherwise Epidemic/Prophet/SprayAndWait re-offer the same message
        // to a peer every tick until the handoff succeeds.
        for plan in &plans {
            self.core.record_history(uid, plan.peer);
        }
        plans
    }

    fn plan_forwards_for_kind(&mut self, uid: &str, msg: &Message, eligible: Vec<NodeId>) -> Vec<ForwardPlan> {
        match &mut self.kind {
            RouterKind::DirectDelivery => eligible
                .into_iter()
                .find(|&p| p == msg.dst)
                .map(|p| vec![ForwardPlan { peer: p, msg: msg.clone() }])
                .unwrap_or_default(),

            RouterKind::FirstContact => eligible
                .into_iter()
                .next()
                .map(|p| vec![ForwardPlan { peer: p, msg: msg.clone() }])
                .unwrap_or_default(),

            RouterKind::Epidemic => eligible.into_iter().map(|p| ForwardPlan { peer: p, msg: msg.clone() }).collect(),

            RouterKind::SprayAndWait(cfg) => {
                let cfg = *cfg;
                let mut remaining = msg.metadata.copies.unwrap_or(1);
                let mut plans = Vec::new();

                if remaining <= 1 {
                    if let Some(&dst_peer) = eligible.iter().find(|&&p| p == msg.dst) {
                        let mut copy = msg.clone();
                        copy.metadata.copies = Some(1);
                        plans.push(ForwardPlan { peer: dst_peer, msg: copy });
                    }
                } else {
                    for peer in eligible {
                        if remaining <= 1 {
                            break;
                        }
                        let to_peer = if cfg.binary { remaining.div_ceil(2) } else { 1 };
                        let keep = remaining - to_peer;
                        let mut copy = msg.clone();
                        copy.metadata.copies = Some(to_peer);
                        plans.push(ForwardPlan { peer, msg: copy });
                        remaining = keep;
                    }
                    if let Some(stored) = self.core.store.get_mut(uid) {
                        stored.metadata.copies = Some(remaining);
                    }
                }
                plans
            }

            RouterKind::Prophet(state) => eligible
                .into_iter()
                .filter(|&p| state.peer_pred(p, msg.dst) > state.pred(msg.dst))
                .map(|p| ForwardPlan { peer: p, msg: msg.clone() })
                .collect(),

            RouterKind::Static(table) => match table.next_hop(msg.dst) {
                Some(hop) if eligible.contains(&hop) => vec![ForwardPlan { peer: hop, msg: msg.clone() }],
                _ => Vec::new(),
            },
        }
    }

    /// Policy-specific cleanup once `uid` has been successfully handed to
    /// `peer` (the scheduled send completed without loss or a mid-flight
    /// contact break).
    pub fn on_tx_succeeded(&mut self, uid: &str, peer: NodeId, mut on_event: impl FnMut(RouterEvent)) {
        on_event(RouterEvent::Forwarded { msg_id: uid.to_string(), peer });

        let reached_dst = self.core.store.get(uid).map(|m| m.dst) == Some(peer);
        let should_delete = match &self.kind {
            RouterKind::DirectDelivery => true,
            RouterKind::FirstContact => true,
            RouterKind::Epidemic => reached_dst,
            RouterKind::Prophet(_) => reached_dst,
            RouterKind::Static(_) => true,
            RouterKind::SprayAndWait(_) => {
                reached_dst || self.core.store.get(uid).and_then(|m| m.metadata.copies) == Some(0)
            }
        };
        if should_delete {
            self.core.remove_message(uid, DropReason::PolicyHandoff, &mut on_event);
        }
    }

    /// `_on_tx_failed`: delegate straight to the shared substrate — every
    /// policy retracts the history entry the same way so a later contact can
    /// retry.
    pub fn on_tx_failed(&mut self, uid: &str, peer: NodeId, on_event: impl FnMut(RouterEvent)) {
        self.core.on_tx_failed(uid, peer, on_event);
    }
}
