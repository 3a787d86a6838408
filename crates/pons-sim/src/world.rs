//! `World` — the simulator's arena of shared, owned state.
//!
//! Every scheduler task (`RouterScanTask`, `AppTickTask`, `GeneratorTask`,
//! and the one-shot delivery closures scheduled by [`crate::tasks`]) holds a
//! cloned `Rc<RefCell<World>>` rather than a raw reference: `pons_sched::Task`
//! only hands `resume` a `&mut Scheduler`, never a path back to the
//! simulator's own state, so every task that needs to touch nodes, routers or
//! applications carries its own handle to the shared arena instead.
//!
//! A [`World`] method never has a [`pons_sched::Scheduler`] to call
//! `schedule` on — when a method decides a future event is needed (a
//! message's transit to a peer completing), it queues a [`PendingDelivery`]
//! instead and lets the calling task drain it (via [`crate::tasks::drain_deliveries`])
//! once its own `&mut World` borrow has been released.

use std::collections::HashMap;

use pons_app::{AppContext, Application, OutgoingMessage};
use pons_core::{NodeId, NodeRng, SimRng, SimTime};
use pons_message::{Message, MessageMetadata, Payload};
use pons_node::{NodeTable, RouterHandle};
use pons_router::{ReceptionOutcome, Router, RouterEvent, ScanMode};
use pons_store::DropReason;
use pons_topology::NetworkPlan;

use crate::observer::SimEvent;
use crate::stats::{NetStats, RoutingStats};

/// A completed send attempt still in flight, queued by a [`World`] method and
/// turned into a real scheduled wake-up by whichever task drains it.
pub struct PendingDelivery {
    pub delay: f64,
    pub from: NodeId,
    pub to: NodeId,
    pub msg: Message,
}

/// The simulator's arena: every node, router, application, and RNG, plus the
/// running statistics and event log accumulated so far.
pub struct World {
    pub nodes: NodeTable,
    pub routers: Vec<Router>,
    pub plan: NetworkPlan,
    pub apps: HashMap<(NodeId, u16), Box<dyn Application>>,
    pub node_rngs: HashMap<NodeId, NodeRng>,
    pub sim_rng: SimRng,
    pub net_stats: NetStats,
    pub routing_stats: RoutingStats,
    pub events: Vec<(SimTime, SimEvent)>,
    pending: Vec<PendingDelivery>,
    app_msg_seq: u64,
}

impl World {
    pub fn new(nodes: NodeTable, routers: Vec<Router>, plan: NetworkPlan, seed: u64) -> Self {
        let node_rngs = nodes.ids().map(|id| (id, NodeRng::new(seed, id))).collect();
        World {
            nodes,
            routers,
            plan,
            apps: HashMap::new(),
            node_rngs,
            sim_rng: SimRng::new(seed),
            net_stats: NetStats::default(),
            routing_stats: RoutingStats::default(),
            events: Vec::new(),
            pending: Vec::new(),
            app_msg_seq: 0,
        }
    }

    pub fn register_app(&mut self, node: NodeId, app: Box<dyn Application>) {
        let service = app.service();
        self.apps.insert((node, service), app);
    }

    /// Drain every [`PendingDelivery`] queued since the last drain. Called
    /// only by [`crate::tasks::drain_deliveries`], which has the `&mut
    /// Scheduler` needed to turn each entry into a real wake-up.
    pub fn drain_pending(&mut self) -> Vec<PendingDelivery> {
        std::mem::take(&mut self.pending)
    }

    /// Drain every [`SimEvent`] recorded since the last drain, in the order
    /// they occurred. Called by [`crate::Simulator::run`] at each chunk
    /// boundary.
    pub fn drain_events(&mut self) -> Vec<(SimTime, SimEvent)> {
        std::mem::take(&mut self.events)
    }

    fn router_handle(&self, node: NodeId) -> Option<RouterHandle> {
        self.nodes.get(node).map(|n| n.router).filter(|h| *h != RouterHandle::INVALID)
    }

    // ── Origination ──────────────────────────────────────────────────────

    /// Originate a brand-new message at `src`, handed to `src`'s router to
    /// seed with policy metadata and store, ready for the next scan's
    /// forwarding pass. Used by both message generators and delivered
    /// applications originating a reply.
    #[allow(clippy::too_many_arguments)]
    pub fn originate(
        &mut self,
        now: SimTime,
        id: impl Into<String>,
        src: NodeId,
        dst: NodeId,
        src_service: u16,
        dst_service: u16,
        payload: Payload,
        ttl: f64,
    ) {
        let Some(handle) = self.router_handle(src) else { return };
        let mut msg = Message::new(id, src, dst, src_service, dst_service, payload, now, ttl, MessageMetadata::bundle());

        let World { routers, routing_stats, events, .. } = self;
        let router = &mut routers[handle.index()];
        router.prepare_outgoing(&mut msg);
        routing_stats.created += 1;
        router.core.store_message(msg, now, |ev| record_event(routing_stats, events, now, src, ev));
    }

    /// Turn a queued [`OutgoingMessage`] from an application at `src` into a
    /// real originated message, via the same `prepare_outgoing`/store path a
    /// generator uses.
    pub fn originate_app_message(&mut self, now: SimTime, src: NodeId, out: OutgoingMessage) {
        self.app_msg_seq += 1;
        let id = format!("app-{}-{}", src.0, self.app_msg_seq);
        let to = out.dst;
        let service = out.dst_service;
        self.originate(now, id, src, to, 0, service, out.payload, out.ttl);
        self.events.push((now, SimEvent::AppSend { node: src, to, service }));
    }

    // ── Forwarding ───────────────────────────────────────────────────────

    /// Ask `node_id`'s router which peers the stored message `uid` should be
    /// forwarded to right now, and attempt each send. Successful attempts
    /// queue a [`PendingDelivery`]; failures (no contact, or a loss roll)
    /// retract the history entry immediately via `Router::on_tx_failed`.
    pub fn try_forward(&mut self, now: SimTime, node_id: NodeId, uid: &str) {
        let Some(handle) = self.router_handle(node_id) else { return };

        let World {
            routers,
            nodes,
            plan,
            node_rngs,
            routing_stats,
            net_stats,
            events,
            pending,
            ..
        } = self;

        let plans = routers[handle.index()].plan_forwards(uid);
        if plans.is_empty() {
            return;
        }
        let Some(node) = nodes.get(node_id) else { return };
        let Some(rng) = node_rngs.get_mut(&node_id) else { return };

        for plan_entry in plans {
            let peer = plan_entry.peer;
            let msg = plan_entry.msg;
            let msg_uid = msg.unique_id();
            let attempts = node.send_plan(now.as_secs(), peer, msg.size(), plan, rng);

            for attempt in attempts {
                net_stats.tx += 1;
                let router = &mut routers[handle.index()];
                match attempt.outcome {
                    pons_node::SendOutcome::NoContact => {
                        net_stats.drop += 1;
                        router.on_tx_failed(&msg_uid, peer, |ev| record_event(routing_stats, events, now, node_id, ev));
                    }
                    pons_node::SendOutcome::Lost => {
                        net_stats.loss += 1;
                        router.on_tx_failed(&msg_uid, peer, |ev| record_event(routing_stats, events, now, node_id, ev));
                    }
                    pons_node::SendOutcome::Delivered { tx_time } => {
                        routing_stats.started += 1;
                        pending.push(PendingDelivery {
                            delay: tx_time,
                            from: node_id,
                            to: peer,
                            msg: msg.clone(),
                        });
                    }
                }
            }
        }
    }

    /// Sender-side bookkeeping once a scheduled transmission of `uid` to
    /// `peer` has actually completed (the peer was still in range at the
    /// delivery instant).
    pub fn succeed_forward(&mut self, now: SimTime, from: NodeId, uid: &str, peer: NodeId) {
        let Some(handle) = self.router_handle(from) else { return };
        let World { routers, routing_stats, events, .. } = self;
        let router = &mut routers[handle.index()];
        router.on_tx_succeeded(uid, peer, |ev| record_event(routing_stats, events, now, from, ev));
    }

    /// Sender-side bookkeeping once a scheduled transmission of `uid` to
    /// `peer` fails to complete (the peer moved out of range mid-transit).
    pub fn fail_forward(&mut self, now: SimTime, from: NodeId, uid: &str, peer: NodeId) {
        let Some(handle) = self.router_handle(from) else { return };
        let World { routers, routing_stats, events, .. } = self;
        let router = &mut routers[handle.index()];
        router.on_tx_failed(uid, peer, |ev| record_event(routing_stats, events, now, from, ev));
    }

    /// The receiver side of a completed delivery: run `to`'s reception path,
    /// and if the message has reached its destination, dispatch it to the
    /// registered application (if any) and originate whatever it queued in
    /// reply.
    pub fn receive_at(&mut self, now: SimTime, to: NodeId, from: NodeId, msg: Message) {
        let Some(handle) = self.router_handle(to) else { return };

        let delivered_outgoing = {
            let World { routers, routing_stats, events, apps, .. } = self;
            let router = &mut routers[handle.index()];
            let outcome = router.on_msg_received(msg, from, now, |ev| record_event(routing_stats, events, now, to, ev));
            match outcome {
                ReceptionOutcome::DeliveredLocal { msg } => {
                    let key = (to, msg.dst_service);
                    let mut outgoing = Vec::new();
                    if let Some(app) = apps.get_mut(&key) {
                        let mut ctx = AppContext::new(to, msg.dst_service, now);
                        app.on_deliver(&msg, &mut ctx);
                        events.push((now, SimEvent::AppDeliver { node: to, service: msg.dst_service }));
                        outgoing = ctx.drain_outgoing();
                    }
                    Some(outgoing)
                }
                ReceptionOutcome::Duplicate | ReceptionOutcome::ToForward { .. } => None,
            }
        };

        if let Some(outgoing) = delivered_outgoing {
            for out in outgoing {
                self.originate_app_message(now, to, out);
            }
        }
    }

    // ── Peer discovery ───────────────────────────────────────────────────

    /// Sweep expired messages, recompute `node_id`'s neighbour set, update
    /// its router's peer set per its [`ScanMode`], run the PRoPHET
    /// predictability exchange for every currently known peer, and attempt
    /// to forward every stored message against the refreshed peer set.
    ///
    /// `pending_hello` is the HELLO-mode state owned by the calling
    /// `RouterScanTask`: the previous scan's visible neighbours, applied to
    /// the peer set *this* round so that promotion lags discovery by one
    /// scan interval, modelling a HELLO round trip without simulating the
    /// control packets themselves.
    pub fn scan_node(&mut self, now: SimTime, node_id: NodeId, pending_hello: &mut Vec<NodeId>) {
        let Some(handle) = self.router_handle(node_id) else { return };

        {
            let World { routers, routing_stats, events, .. } = self;
            let router = &mut routers[handle.index()];
            router.core.sweep_expired(now, |ev| record_event(routing_stats, events, now, node_id, ev));
        }

        // `calc_neighbors` needs `&mut Node` and `&NodeTable` at once; a
        // node table never aliases itself here because we hand it a
        // snapshot clone rather than its own owning table. Acceptable
        // per-scan cost for the population sizes PONS targets; a future
        // pass could instead give `NodeTable` a split-borrow accessor.
        let snapshot = self.nodes.clone();
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.calc_neighbors(now.as_secs(), &snapshot, &mut self.plan);
        }

        let current: Vec<NodeId> = self
            .nodes
            .get(node_id)
            .map(|n| {
                let mut seen = std::collections::HashSet::new();
                n.interfaces()
                    .flat_map(|iface| iface.neighbors.iter())
                    .filter(|id| seen.insert(*id))
                    .collect()
            })
            .unwrap_or_default();

        let newly = {
            let router = &mut self.routers[handle.index()];
            match router.scan_mode {
                ScanMode::NeighborSync => router.core.sync_peers_from_neighbors(current),
                ScanMode::Hello => {
                    router.core.begin_scan();
                    let acked = std::mem::replace(pending_hello, current);
                    acked.into_iter().filter(|&p| router.core.note_peer_seen(p)).collect()
                }
            }
        };

        for &peer in &newly {
            self.events.push((now, SimEvent::Router { node: node_id, event: RouterEvent::PeerDiscovered { peer } }));
        }

        let peers = self.routers[handle.index()].core.peers.clone();
        for peer in peers {
            let peer_table = self
                .router_handle(peer)
                .map(|h| self.routers[h.index()].kind.prophet_table())
                .unwrap_or_default();
            self.routers[handle.index()].kind.on_peer_encounter(peer, now.as_secs(), &peer_table);
        }

        let uids: Vec<String> = self.routers[handle.index()].core.store.iter().map(|m| m.unique_id()).collect();
        for uid in uids {
            self.try_forward(now, node_id, &uid);
        }
    }

    // ── Application ticks ────────────────────────────────────────────────

    /// Drive one application's own timer (e.g. a ping interval) and
    /// originate whatever it queued.
    pub fn tick_app(&mut self, now: SimTime, node_id: NodeId, service: u16) {
        let outgoing = {
            let Some(app) = self.apps.get_mut(&(node_id, service)) else { return };
            let mut ctx = AppContext::new(node_id, service, now);
            app.tick(now, &mut ctx);
            ctx.drain_outgoing()
        };
        for out in outgoing {
            self.originate_app_message(now, node_id, out);
        }
    }
}

/// Fold one [`RouterEvent`] into the running [`RoutingStats`] and append it
/// to the event log, tagged with the node it happened at.
///
/// The counter mapping: `Dropped{Expired}` is a loss (`dropped`),
/// `Dropped{Evicted}` is capacity pressure (`removed`);
/// `Dropped{PolicyHandoff}` is not double-counted since the same handoff
/// already incremented `relayed` via its paired `Forwarded` event.
/// `Rx`/`Stored`/`PeerDiscovered` carry no counter of their own — they
/// exist purely for the event log.
fn record_event(routing: &mut RoutingStats, events: &mut Vec<(SimTime, SimEvent)>, now: SimTime, node: NodeId, ev: RouterEvent) {
    match &ev {
        RouterEvent::Dup { .. } => routing.dups += 1,
        RouterEvent::Delivered { hops, latency, .. } => {
            routing.delivered += 1;
            routing.hops += *hops as u64;
            routing.latency += *latency;
        }
        RouterEvent::Forwarded { .. } => routing.relayed += 1,
        RouterEvent::Aborted { .. } => routing.aborted += 1,
        RouterEvent::Dropped { reason, .. } => match reason {
            DropReason::Expired => routing.dropped += 1,
            DropReason::Evicted => routing.removed += 1,
            DropReason::PolicyHandoff | DropReason::Delivered => {}
        },
        RouterEvent::Rx { .. } | RouterEvent::Stored { .. } | RouterEvent::PeerDiscovered { .. } => {}
    }
    events.push((now, SimEvent::Router { node, event: ev }));
}
