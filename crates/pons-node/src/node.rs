//! `Node` — identity, position, interfaces, and neighbour/tx-eligibility glue.
//!
//! The actual scheduling of a delivery callback is the simulator facade's
//! job (`pons-node` has no dependency on `pons-sched`); this crate produces
//! the pure, deterministic *decision* of who is eligible to receive and how
//! long the transfer would take, leaving the scheduling side-effect to the
//! caller.

use std::collections::HashMap;

use pons_core::{NodeId, NodeRng, Position, BROADCAST_ADDR};
use pons_topology::NetworkPlan;

use crate::error::{NodeError, NodeResult};
use crate::interface::Interface;
use crate::router_handle::RouterHandle;
use crate::table::NodeTable;

/// How one attempted transmission to one receiver resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SendOutcome {
    /// Delivered after `tx_time` seconds — the caller should schedule the
    /// receiver's `on_recv` at `now + tx_time`.
    Delivered { tx_time: f64 },
    /// Lost to the contact's loss probability. No delivery is scheduled.
    Lost,
    /// No contact governs this pair at `now`; the attempt is silently
    /// skipped in `send`.
    NoContact,
}

/// One outbound attempt produced by [`Node::send_plan`], scoped to the
/// interface it was attempted over.
#[derive(Clone, Debug, PartialEq)]
pub struct SendAttempt {
    pub interface: String,
    pub receiver: NodeId,
    pub outcome: SendOutcome,
}

/// A node in the simulated network.
///
/// Carries a [`RouterHandle`] rather than an owned or borrowed `Router` —
/// the simulator resolves it against its own router arena, so `Node` never
/// back-points into state it doesn't own.
#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub position: Position,
    pub router: RouterHandle,
    interfaces: HashMap<String, Interface>,
    /// Interfaces in declaration order — a `HashMap` alone has none, and
    /// both `calc_neighbors` and `send_plan` must iterate deterministically.
    interface_order: Vec<String>,
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>, position: Position) -> Self {
        Node {
            id,
            name: name.into(),
            position,
            router: RouterHandle::INVALID,
            interfaces: HashMap::new(),
            interface_order: Vec::new(),
        }
    }

    pub fn with_router(mut self, router: RouterHandle) -> Self {
        self.router = router;
        self
    }

    pub fn add_interface(&mut self, iface: Interface) {
        if !self.interfaces.contains_key(&iface.name) {
            self.interface_order.push(iface.name.clone());
        }
        self.interfaces.insert(iface.name.clone(), iface);
    }

    pub fn interface(&self, name: &str) -> NodeResult<&Interface> {
        self.interfaces
            .get(name)
            .ok_or_else(|| NodeError::UnknownInterface(name.to_string()))
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.interface_order.iter().map(move |n| &self.interfaces[n])
    }

    /// `true` if `peer` is currently a neighbour on any interface.
    pub fn has_neighbor(&self, peer: NodeId) -> bool {
        self.interfaces().any(|iface| iface.neighbors.contains(peer))
    }

    /// Recompute every interface's neighbour set at `now`. Returns nodes
    /// newly visible on any interface since the last call, deduplicated
    /// across interfaces — the input to `on_peer_discovered`.
    ///
    /// A node never appears in its own neighbour set: every candidate list
    /// below excludes `self.id` up front.
    pub fn calc_neighbors(&mut self, now: f64, table: &NodeTable, plan: &mut NetworkPlan) -> Vec<NodeId> {
        let mut newly_seen = Vec::new();
        let my_id = self.id;
        let my_pos = self.position;

        for name in self.interface_order.clone() {
            let iface = self.interfaces.get_mut(&name).expect("interface_order kept in sync");
            let candidates: Vec<NodeId> = match iface.kind {
                crate::interface::InterfaceKind::Proximity { range_m, .. } => table
                    .nodes()
                    .filter(|n| n.id != my_id)
                    .filter(|n| my_pos.within_range(n.position, range_m))
                    .map(|n| n.id)
                    .collect(),
                crate::interface::InterfaceKind::Plan => table
                    .nodes()
                    .filter(|n| n.id != my_id)
                    .filter(|n| plan.has_contact(now, my_id, n.id))
                    .map(|n| n.id)
                    .collect(),
            };
            for id in iface.neighbors.replace(candidates) {
                if !newly_seen.contains(&id) {
                    newly_seen.push(id);
                }
            }
        }
        newly_seen
    }

    /// Enumerate the outcome of sending a `size`-byte message to `to` over
    /// every interface. `to == BROADCAST_ADDR` fans out to each interface's
    /// current neighbours; otherwise only interfaces where `to` is already a
    /// neighbour are attempted — everywhere else the receiver is simply
    /// absent from the returned list (not an error).
    pub fn send_plan(
        &self,
        now: f64,
        to: NodeId,
        size: u64,
        plan: &mut NetworkPlan,
        rng: &mut NodeRng,
    ) -> Vec<SendAttempt> {
        let mut attempts = Vec::new();

        for iface in self.interfaces() {
            let receivers: Vec<NodeId> = if to == BROADCAST_ADDR {
                iface.neighbors.iter().collect()
            } else if iface.neighbors.contains(to) {
                vec![to]
            } else {
                continue;
            };

            for receiver in receivers {
                let outcome = self.attempt_send(now, receiver, size, plan, rng);
                attempts.push(SendAttempt {
                    interface: iface.name.clone(),
                    receiver,
                    outcome,
                });
            }
        }

        attempts
    }

    fn attempt_send(&self, now: f64, receiver: NodeId, size: u64, plan: &mut NetworkPlan, rng: &mut NodeRng) -> SendOutcome {
        if !plan.has_contact(now, self.id, receiver) {
            return SendOutcome::NoContact;
        }
        let loss = plan.loss_for_contact(now, self.id, receiver);
        if rng.gen_bool(loss) {
            return SendOutcome::Lost;
        }
        match plan.tx_time_for_contact(now, self.id, receiver, size, rng) {
            Ok(tx_time) => SendOutcome::Delivered { tx_time },
            Err(_) => SendOutcome::NoContact,
        }
    }

    /// Re-verify that `from` is still a neighbour at the delivery instant —
    /// the contact may have ended mid-transit. Called by the simulator
    /// facade from the scheduled `on_recv` callback.
    pub fn still_neighbors(&self, from: NodeId) -> bool {
        self.has_neighbor(from)
    }
}
