//! Unit tests for the router substrate and forwarding policies.

#[cfg(test)]
mod direct_delivery {
    use std::sync::Arc;

    use pons_core::{NodeId, SimTime};
    use pons_message::{Message, MessageMetadata};

    use crate::kind::RouterKind;
    use crate::router::{Router, ScanMode};

    fn bundle(src: u32, dst: u32) -> Message {
        Message::new(
            "m",
            NodeId(src),
            NodeId(dst),
            0,
            0,
            Arc::from(vec![0u8; 10].into_boxed_slice()),
            SimTime(0.0),
            100.0,
            MessageMetadata::bundle(),
        )
    }

    #[test]
    fn forwards_only_when_destination_is_a_peer() {
        let mut r = Router::new(NodeId(1), 0, 5.0, RouterKind::DirectDelivery, ScanMode::NeighborSync);
        let uid = bundle(1, 9).unique_id();
        r.core.store_message(bundle(1, 9), SimTime(0.0), |_| {});

        r.core.sync_peers_from_neighbors(vec![NodeId(5)]);
        assert!(r.plan_forwards(&uid).is_empty());

        r.core.sync_peers_from_neighbors(vec![NodeId(9)]);
        let plans = r.plan_forwards(&uid);
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].peer, NodeId(9));
    }

    #[test]
    fn deletes_store_on_successful_handoff() {
        let mut r = Router::new(NodeId(1), 0, 5.0, RouterKind::DirectDelivery, ScanMode::NeighborSync);
        let uid = bundle(1, 9).unique_id();
        r.core.store_message(bundle(1, 9), SimTime(0.0), |_| {});
        r.on_tx_succeeded(&uid, NodeId(9), |_| {});
        assert!(r.core.store.get(&uid).is_none());
    }
}

#[cfg(test)]
mod epidemic {
    use std::sync::Arc;

    use pons_core::{NodeId, SimTime};
    use pons_message::{Message, MessageMetadata};

    use crate::kind::RouterKind;
    use crate::router::{Router, ScanMode};

    fn bundle(src: u32, dst: u32) -> Message {
        Message::new(
            "m",
            NodeId(src),
            NodeId(dst),
            0,
            0,
            Arc::from(vec![0u8; 10].into_boxed_slice()),
            SimTime(0.0),
            100.0,
            MessageMetadata::bundle(),
        )
    }

    #[test]
    fn forwards_to_every_peer_not_yet_in_history() {
        let mut r = Router::new(NodeId(1), 0, 5.0, RouterKind::Epidemic, ScanMode::NeighborSync);
        let uid = bundle(1, 9).unique_id();
        r.core.store_message(bundle(1, 9), SimTime(0.0), |_| {});
        r.core.sync_peers_from_neighbors(vec![NodeId(2), NodeId(3)]);

        let plans = r.plan_forwards(&uid);
        let peers: Vec<NodeId> = plans.iter().map(|p| p.peer).collect();
        assert_eq!(peers, vec![NodeId(2), NodeId(3)]);

        r.core.record_history(&uid, NodeId(2));
        let plans2 = r.plan_forwards(&uid);
        assert_eq!(plans2.len(), 1);
        assert_eq!(plans2[0].peer, NodeId(3));
    }

    #[test]
    fn retains_copy_until_destination_directly_reached() {
        let mut r = Router::new(NodeId(1), 0, 5.0, RouterKind::Epidemic, ScanMode::NeighborSync);
        let uid = bundle(1, 9).unique_id();
        r.core.store_message(bundle(1, 9), SimTime(0.0), |_| {});

        r.on_tx_succeeded(&uid, NodeId(2), |_| {});
        assert!(r.core.store.get(&uid).is_some(), "relayed copy is not the destination, message stays");

        r.on_tx_succeeded(&uid, NodeId(9), |_| {});
        assert!(r.core.store.get(&uid).is_none(), "destination itself reached, message is done");
    }
}

#[cfg(test)]
mod spray_and_wait {
    use std::sync::Arc;

    use pons_core::{NodeId, SimTime};
    use pons_message::{Message, MessageMetadata};

    use crate::kind::{RouterKind, SprayAndWaitConfig};
    use crate::router::{Router, ScanMode};

    fn bundle(src: u32, dst: u32) -> Message {
        Message::new(
            "m",
            NodeId(src),
            NodeId(dst),
            0,
            0,
            Arc::from(vec![0u8; 10].into_boxed_slice()),
            SimTime(0.0),
            100.0,
            MessageMetadata::bundle(),
        )
    }

    #[test]
    fn binary_split_halves_copies_to_new_peer() {
        let mut r = Router::new(
            NodeId(1),
            0,
            5.0,
            RouterKind::SprayAndWait(SprayAndWaitConfig { binary: true, initial_copies: 8 }),
            ScanMode::NeighborSync,
        );
        let mut msg = bundle(1, 9);
        r.prepare_outgoing(&mut msg);
        assert_eq!(msg.metadata.copies, Some(8));

        let uid = msg.unique_id();
        r.core.store_message(msg, SimTime(0.0), |_| {});
        r.core.sync_peers_from_neighbors(vec![NodeId(2)]);

        let plans = r.plan_forwards(&uid);
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].peer, NodeId(2));
        assert_eq!(plans[0].msg.metadata.copies, Some(4));
        assert_eq!(r.core.store.get(&uid).unwrap().metadata.copies, Some(4));
    }

    #[test]
    fn stops_splitting_at_one_copy_and_only_delivers_direct() {
        let mut r = Router::new(
            NodeId(1),
            0,
            5.0,
            RouterKind::SprayAndWait(SprayAndWaitConfig { binary: true, initial_copies: 1 }),
            ScanMode::NeighborSync,
        );
        let mut msg = bundle(1, 9);
        r.prepare_outgoing(&mut msg);
        let uid = msg.unique_id();
        r.core.store_message(msg, SimTime(0.0), |_| {});

        r.core.sync_peers_from_neighbors(vec![NodeId(2)]);
        assert!(r.plan_forwards(&uid).is_empty(), "last copy never relays to a non-destination peer");

        r.core.sync_peers_from_neighbors(vec![NodeId(9)]);
        let plans = r.plan_forwards(&uid);
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].peer, NodeId(9));
    }
}

#[cfg(test)]
mod prophet {
    use std::collections::HashMap;

    use pons_core::NodeId;

    use crate::prophet::{ProphetConfig, ProphetState};

    #[test]
    fn first_encounter_uses_the_first_encounter_constant() {
        let cfg = ProphetConfig::default();
        let mut state = ProphetState::new(NodeId(1), cfg);
        state.on_peer_encounter(NodeId(2), 10.0, &HashMap::new());
        assert_eq!(state.pred(NodeId(2)), cfg.p_encounter_first);
    }

    #[test]
    fn aging_skips_self_and_the_just_met_peer() {
        let cfg = ProphetConfig::default();
        let mut state = ProphetState::new(NodeId(1), cfg);
        state.on_peer_encounter(NodeId(2), 0.0, &HashMap::new());
        let before = state.pred(NodeId(2));

        // Meeting a different peer later should age node 2's entry, not
        // reset or skip it.
        state.on_peer_encounter(NodeId(3), 10.0, &HashMap::new());
        let after = state.pred(NodeId(2));
        assert!(after < before, "pred(2) should have decayed: {before} -> {after}");
        assert_eq!(state.pred(NodeId(3)), cfg.p_encounter_first, "freshly met peer is not aged on its own encounter");
    }

    #[test]
    fn transitive_update_takes_the_max_of_existing_and_propagated() {
        let cfg = ProphetConfig::default();
        let mut state = ProphetState::new(NodeId(1), cfg);
        let mut peer_table = HashMap::new();
        peer_table.insert(NodeId(5), 0.9);
        state.on_peer_encounter(NodeId(2), 0.0, &peer_table);

        let expected = cfg.p_encounter_first * 0.9 * cfg.beta;
        assert!((state.pred(NodeId(5)) - expected).abs() < 1e-9);
    }
}

#[cfg(test)]
mod static_router {
    use pons_core::NodeId;

    use crate::static_router::StaticTable;

    #[test]
    fn bfs_picks_the_first_hop_on_the_shortest_path() {
        let edges = [(NodeId(1), NodeId(2)), (NodeId(2), NodeId(3)), (NodeId(1), NodeId(4)), (NodeId(4), NodeId(3))];
        let table = StaticTable::build(&edges, NodeId(1));
        assert!(table.next_hop(NodeId(3)) == Some(NodeId(2)) || table.next_hop(NodeId(3)) == Some(NodeId(4)));
        assert_eq!(table.next_hop(NodeId(2)), Some(NodeId(2)));
    }

    #[test]
    fn wildcard_covers_unreachable_destinations() {
        let table = StaticTable::build(&[(NodeId(1), NodeId(2))], NodeId(1)).with_wildcard(NodeId(2));
        assert_eq!(table.next_hop(NodeId(99)), Some(NodeId(2)));
    }
}

#[cfg(test)]
mod reception {
    use std::sync::Arc;

    use pons_core::{NodeId, SimTime};
    use pons_message::{Message, MessageMetadata};

    use crate::core::{ReceptionOutcome, RouterCore};

    fn bundle(src: u32, dst: u32) -> Message {
        Message::new(
            "m",
            NodeId(src),
            NodeId(dst),
            0,
            0,
            Arc::from(vec![0u8; 10].into_boxed_slice()),
            SimTime(0.0),
            100.0,
            MessageMetadata::bundle(),
        )
    }

    #[test]
    fn duplicate_detection_is_keyed_on_history_not_store() {
        let mut core = RouterCore::new(NodeId(9), 0, 5.0);
        let msg = bundle(1, 9);
        let first = core.receive(msg.clone(), NodeId(2), SimTime(1.0), |_| {});
        assert!(matches!(first, ReceptionOutcome::DeliveredLocal { .. }));

        let second = core.receive(msg, NodeId(3), SimTime(2.0), |_| {});
        assert!(matches!(second, ReceptionOutcome::Duplicate));
    }
}
