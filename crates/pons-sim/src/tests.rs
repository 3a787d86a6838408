//! Integration tests for `Simulator`, covering end-to-end delivery
//! scenarios and the statistics/store invariants a run must preserve.

#[cfg(test)]
mod support {
    use std::collections::HashMap;

    use pons_core::{NodeId, Position, RealtimeConfig, SimConfig};
    use pons_node::{Interface, Node, NodeTable, RouterHandle};
    use pons_router::{Router, ScanMode};
    use pons_router::kind::RouterKind;
    use pons_topology::NetworkPlan;

    /// `SimConfig` with realtime pacing off and every chunk boundary every
    /// simulated second, generous enough for short test runs.
    pub fn config(seed: u64, duration_secs: f64) -> SimConfig {
        SimConfig {
            start_unix_secs: 0,
            duration_secs,
            seed,
            chunk_secs: 5.0,
            realtime: None::<RealtimeConfig>,
        }
    }

    /// A node with a single plan-driven interface and a router of `kind`,
    /// scanning every `scan_interval` seconds.
    pub fn node_with_router(
        id: u32,
        kind: RouterKind,
        capacity: u64,
        scan_interval: f64,
    ) -> (Node, Router) {
        let mut node = Node::new(NodeId(id), format!("n{id}"), Position::default());
        node.add_interface(Interface::plan_driven("plan0"));
        node.router = RouterHandle(id);
        let router = Router::new(NodeId(id), capacity, scan_interval, kind, ScanMode::NeighborSync);
        (node, router)
    }

    pub fn table(nodes: Vec<Node>) -> NodeTable {
        let mut t = NodeTable::new();
        for n in nodes {
            t.insert(n);
        }
        t
    }

    pub fn empty_plan() -> NetworkPlan {
        NetworkPlan::new(HashMap::new())
    }
}

#[cfg(test)]
mod two_node_direct_delivery {
    use pons_core::NodeId;
    use pons_message::ValueOrRange;
    use pons_router::kind::RouterKind;
    use pons_topology::network_plan::LinkProps;

    use crate::generators::{GeneratorConfig, GeneratorKind};
    use crate::observer::NoopObserver;
    use crate::SimulatorBuilder;

    use super::support::*;

    /// Scenario 1: a single fixed contact, one message, direct delivery —
    /// `delivered=1`, `hops_avg=1`, `latency_avg ≈ size/bandwidth`.
    #[test]
    fn delivers_and_reports_expected_latency() {
        let (node_a, router_a) = node_with_router(0, RouterKind::DirectDelivery, 0, 1.0);
        let (node_b, router_b) = node_with_router(1, RouterKind::DirectDelivery, 0, 1.0);
        let nodes = table(vec![node_a, node_b]);

        let mut plan = empty_plan();
        plan.add_node(NodeId(0), Default::default());
        plan.add_node(NodeId(1), Default::default());
        plan.add_edge(
            NodeId(0),
            NodeId(1),
            LinkProps { bandwidth_bps: 1_000_000, loss: 0.0, delay_secs: 0.0, jitter_secs: 0.0 },
        );

        let gen = GeneratorConfig {
            kind: GeneratorKind::Single,
            interval: ValueOrRange::Scalar(1_000_000.0), // fires once within the run
            src: ValueOrRange::Scalar(NodeId(0)),
            dst: ValueOrRange::Scalar(NodeId(1)),
            size: ValueOrRange::Scalar(1000),
            ttl: ValueOrRange::Scalar(100.0),
            id_prefix: "m".to_string(),
            start_time: 10.0,
            end_time: None,
            src_service: 0,
            dst_service: 0,
        };

        let mut sim = SimulatorBuilder::new(config(1, 60.0), nodes, vec![router_a, router_b])
            .plan(plan)
            .generator(gen)
            .build()
            .unwrap();

        sim.run(&mut NoopObserver).unwrap();

        let stats = sim.routing_stats();
        assert_eq!(stats.created, 1);
        assert_eq!(stats.delivered, 1);
        assert!(stats.relayed >= 1);
        let derived = sim.derived_stats();
        assert_eq!(derived.hops_avg, 1.0);
        assert!((derived.latency_avg - 0.001).abs() < 1e-9);
    }

    /// Scenario 2: the destination is never in contact — nothing is ever
    /// delivered, `delivery_prob == 0`.
    #[test]
    fn unreachable_destination_never_delivers() {
        let (node_a, router_a) = node_with_router(0, RouterKind::DirectDelivery, 0, 1.0);
        let (node_b, router_b) = node_with_router(1, RouterKind::DirectDelivery, 0, 1.0);
        let (node_c, router_c) = node_with_router(2, RouterKind::DirectDelivery, 0, 1.0);
        let nodes = table(vec![node_a, node_b, node_c]);

        let mut plan = empty_plan();
        for id in [0, 1, 2] {
            plan.add_node(NodeId(id), Default::default());
        }
        plan.add_edge(
            NodeId(0),
            NodeId(1),
            LinkProps { bandwidth_bps: 1_000_000, loss: 0.0, delay_secs: 0.0, jitter_secs: 0.0 },
        );

        let gen = GeneratorConfig {
            kind: GeneratorKind::Single,
            interval: ValueOrRange::Scalar(1_000_000.0),
            src: ValueOrRange::Scalar(NodeId(0)),
            dst: ValueOrRange::Scalar(NodeId(2)), // never in contact with A
            size: ValueOrRange::Scalar(1000),
            ttl: ValueOrRange::Scalar(100.0),
            id_prefix: "m".to_string(),
            start_time: 10.0,
            end_time: None,
            src_service: 0,
            dst_service: 0,
        };

        let mut sim = SimulatorBuilder::new(config(1, 60.0), nodes, vec![router_a, router_b, router_c])
            .plan(plan)
            .generator(gen)
            .build()
            .unwrap();

        sim.run(&mut NoopObserver).unwrap();

        let stats = sim.routing_stats();
        assert_eq!(stats.created, 1);
        assert_eq!(stats.delivered, 0);
        assert_eq!(sim.derived_stats().delivery_prob, 0.0);
    }
}

#[cfg(test)]
mod epidemic_chain {
    use pons_core::NodeId;
    use pons_message::ValueOrRange;
    use pons_router::kind::RouterKind;
    use pons_topology::{Contact, CoreContactPlan};

    use crate::generators::{GeneratorConfig, GeneratorKind};
    use crate::observer::NoopObserver;
    use crate::SimulatorBuilder;

    use super::support::*;

    /// Scenario 3: A-B contact in `[0,50]`, B-C contact in `[30,80]`. A
    /// message from A to C at t=5 can only cross via B once both windows
    /// overlap B's possession of it — epidemic flooding gets it there in
    /// two hops.
    #[test]
    fn epidemic_relays_across_overlapping_windows() {
        let (node_a, router_a) = node_with_router(0, RouterKind::Epidemic, 0, 1.0);
        let (node_b, router_b) = node_with_router(1, RouterKind::Epidemic, 0, 1.0);
        let (node_c, router_c) = node_with_router(2, RouterKind::Epidemic, 0, 1.0);
        let nodes = table(vec![node_a, node_b, node_c]);

        let contacts = vec![
            Contact::scheduled((0.0, 50.0), (NodeId(0), NodeId(1)), 1_000_000, 0.0, 0.0, 0.0),
            Contact::scheduled((30.0, 80.0), (NodeId(1), NodeId(2)), 1_000_000, 0.0, 0.0, 0.0),
        ];
        let mut plan = empty_plan();
        for id in [0, 1, 2] {
            plan.add_node(NodeId(id), Default::default());
        }
        plan.set_contacts(CoreContactPlan::new(contacts, false, true));

        let gen = GeneratorConfig {
            kind: GeneratorKind::Single,
            interval: ValueOrRange::Scalar(1_000_000.0),
            src: ValueOrRange::Scalar(NodeId(0)),
            dst: ValueOrRange::Scalar(NodeId(2)),
            size: ValueOrRange::Scalar(100),
            ttl: ValueOrRange::Scalar(200.0),
            id_prefix: "m".to_string(),
            start_time: 5.0,
            end_time: None,
            src_service: 0,
            dst_service: 0,
        };

        let mut sim = SimulatorBuilder::new(config(1, 100.0), nodes, vec![router_a, router_b, router_c])
            .plan(plan)
            .generator(gen)
            .build()
            .unwrap();

        sim.run(&mut NoopObserver).unwrap();

        let stats = sim.routing_stats();
        assert_eq!(stats.delivered, 1);
        assert_eq!(sim.derived_stats().hops_avg, 2.0);
    }
}

#[cfg(test)]
mod capacity_and_ttl {
    use pons_core::NodeId;
    use pons_message::ValueOrRange;
    use pons_router::kind::RouterKind;

    use crate::generators::{GeneratorConfig, GeneratorKind};
    use crate::observer::NoopObserver;
    use crate::SimulatorBuilder;

    use super::support::*;

    /// Scenario 4: capacity-bounded eviction. Four same-sized messages from
    /// an isolated node with capacity for three; the fourth triggers
    /// eviction of the smallest-and-oldest.
    #[test]
    fn capacity_eviction_keeps_store_bounded() {
        let (node_a, router_a) = node_with_router(0, RouterKind::Epidemic, 300, 1.0);
        let nodes = table(vec![node_a]);
        let plan = empty_plan();

        let gen = GeneratorConfig {
            kind: GeneratorKind::Single,
            interval: ValueOrRange::Scalar(1.0),
            src: ValueOrRange::Scalar(NodeId(0)),
            dst: ValueOrRange::Scalar(NodeId(99)), // unreachable, so messages just sit in the store
            size: ValueOrRange::Scalar(100),
            ttl: ValueOrRange::Scalar(1_000.0),
            id_prefix: "m".to_string(),
            start_time: 1.0,
            end_time: Some(4.0),
            src_service: 0,
            dst_service: 0,
        };

        let mut sim = SimulatorBuilder::new(config(1, 10.0), nodes, vec![router_a])
            .plan(plan)
            .generator(gen)
            .build()
            .unwrap();

        sim.run(&mut NoopObserver).unwrap();

        let world = sim.world();
        let world = world.borrow();
        let router = &world.routers[0];
        assert_eq!(router.core.store.len(), 3);
        assert!(router.core.store.used_bytes() <= 300);
        assert!(sim.routing_stats().removed >= 1);
    }

    /// Scenario 5: a message whose destination it never meets expires and
    /// is swept away by TTL.
    #[test]
    fn ttl_expiry_drops_undelivered_messages() {
        let (node_a, router_a) = node_with_router(0, RouterKind::Epidemic, 0, 1.0);
        let nodes = table(vec![node_a]);
        let plan = empty_plan();

        let gen = GeneratorConfig {
            kind: GeneratorKind::Single,
            interval: ValueOrRange::Scalar(1_000_000.0),
            src: ValueOrRange::Scalar(NodeId(0)),
            dst: ValueOrRange::Scalar(NodeId(99)),
            size: ValueOrRange::Scalar(100),
            ttl: ValueOrRange::Scalar(10.0),
            id_prefix: "m".to_string(),
            start_time: 0.0,
            end_time: None,
            src_service: 0,
            dst_service: 0,
        };

        let mut sim = SimulatorBuilder::new(config(1, 100.0), nodes, vec![router_a])
            .plan(plan)
            .generator(gen)
            .build()
            .unwrap();

        sim.run(&mut NoopObserver).unwrap();

        assert_eq!(sim.routing_stats().delivered, 0);
        assert!(sim.routing_stats().dropped >= 1);
        let world = sim.world();
        assert!(world.borrow().routers[0].core.store.is_empty());
    }
}

#[cfg(test)]
mod spray_and_wait {
    use pons_core::NodeId;
    use pons_message::ValueOrRange;
    use pons_router::kind::{RouterKind, SprayAndWaitConfig};
    use pons_topology::{Contact, CoreContactPlan};

    use crate::generators::{GeneratorConfig, GeneratorKind};
    use crate::observer::NoopObserver;
    use crate::SimulatorBuilder;

    use super::support::*;

    /// Scenario 6: binary spray-and-wait starting with 8 copies. A meets B
    /// at t=10 and splits the copies in half.
    #[test]
    fn binary_split_halves_copies_on_first_contact() {
        let cfg = SprayAndWaitConfig { binary: true, initial_copies: 8 };
        let (node_a, router_a) = node_with_router(0, RouterKind::SprayAndWait(cfg), 0, 1.0);
        let (node_b, router_b) = node_with_router(1, RouterKind::SprayAndWait(cfg), 0, 1.0);
        let nodes = table(vec![node_a, node_b]);

        let contacts = vec![Contact::scheduled((9.0, 11.0), (NodeId(0), NodeId(1)), 1_000_000, 0.0, 0.0, 0.0)];
        let mut plan = empty_plan();
        plan.add_node(NodeId(0), Default::default());
        plan.add_node(NodeId(1), Default::default());
        plan.set_contacts(CoreContactPlan::new(contacts, false, true));

        let gen = GeneratorConfig {
            kind: GeneratorKind::Single,
            interval: ValueOrRange::Scalar(1_000_000.0),
            src: ValueOrRange::Scalar(NodeId(0)),
            dst: ValueOrRange::Scalar(NodeId(2)), // neither A nor B — no direct delivery this leg
            size: ValueOrRange::Scalar(10),
            ttl: ValueOrRange::Scalar(200.0),
            id_prefix: "m".to_string(),
            start_time: 1.0,
            end_time: None,
            src_service: 0,
            dst_service: 0,
        };

        let mut sim = SimulatorBuilder::new(config(1, 20.0), nodes, vec![router_a, router_b])
            .plan(plan)
            .generator(gen)
            .build()
            .unwrap();

        sim.run(&mut NoopObserver).unwrap();

        let world = sim.world();
        let world = world.borrow();
        let uid = "m-0-0-1.000000"; // unique_id() is "{id}-{src}-{created:.6}"
        let a_copies = world.routers[0].core.store.get(uid).and_then(|m| m.metadata.copies);
        let b_copies = world.routers[1].core.store.get(uid).and_then(|m| m.metadata.copies);
        assert_eq!(a_copies, Some(4));
        assert_eq!(b_copies, Some(4));
    }
}

#[cfg(test)]
mod determinism {
    use pons_core::NodeId;
    use pons_message::ValueOrRange;
    use pons_router::kind::RouterKind;
    use pons_topology::network_plan::LinkProps;

    use crate::generators::{GeneratorConfig, GeneratorKind};
    use crate::observer::NoopObserver;
    use crate::SimulatorBuilder;

    use super::support::*;

    fn run_once() -> (crate::NetStats, crate::RoutingStats) {
        let (node_a, router_a) = node_with_router(0, RouterKind::Epidemic, 0, 1.0);
        let (node_b, router_b) = node_with_router(1, RouterKind::Epidemic, 0, 1.0);
        let nodes = table(vec![node_a, node_b]);

        let mut plan = empty_plan();
        plan.add_node(NodeId(0), Default::default());
        plan.add_node(NodeId(1), Default::default());
        plan.add_edge(
            NodeId(0),
            NodeId(1),
            LinkProps { bandwidth_bps: 1_000, loss: 0.2, delay_secs: 0.0, jitter_secs: 0.5 },
        );

        let gen = GeneratorConfig {
            kind: GeneratorKind::Burst,
            interval: ValueOrRange::Scalar(2.0),
            src: ValueOrRange::Range(NodeId(0), NodeId(1)),
            dst: ValueOrRange::Scalar(NodeId(1)),
            size: ValueOrRange::Range(10, 1000),
            ttl: ValueOrRange::Scalar(50.0),
            id_prefix: "m".to_string(),
            start_time: 0.0,
            end_time: Some(30.0),
            src_service: 0,
            dst_service: 0,
        };

        let mut sim = SimulatorBuilder::new(config(7, 40.0), nodes, vec![router_a, router_b])
            .plan(plan)
            .generator(gen)
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();
        (sim.net_stats(), sim.routing_stats())
    }

    /// Running the same seed twice must produce identical statistics.
    #[test]
    fn same_seed_is_fully_reproducible() {
        let (net1, routing1) = run_once();
        let (net2, routing2) = run_once();
        assert_eq!(net1, net2);
        assert_eq!(routing1, routing2);
    }
}
