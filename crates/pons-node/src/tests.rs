//! Unit tests for `Node`, interfaces, and the node table.

#[cfg(test)]
mod interfaces {
    use pons_core::NodeId;

    use crate::interface::NeighborSet;

    #[test]
    fn replace_reports_only_newly_seen() {
        let mut set = NeighborSet::new();
        let first = set.replace(vec![NodeId(1), NodeId(2)]);
        assert_eq!(first, vec![NodeId(1), NodeId(2)]);

        let second = set.replace(vec![NodeId(2), NodeId(3)]);
        assert_eq!(second, vec![NodeId(3)]);
        assert!(set.contains(NodeId(2)));
        assert!(!set.contains(NodeId(1)));
    }

    #[test]
    fn empty_set_has_no_neighbors() {
        let set = NeighborSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }
}

#[cfg(test)]
mod calc_neighbors {
    use pons_core::{NodeId, Position};
    use pons_topology::NetworkPlan;

    use crate::interface::Interface;
    use crate::node::Node;
    use crate::table::NodeTable;

    fn table_with(positions: &[(u32, f64, f64)]) -> NodeTable {
        let mut table = NodeTable::new();
        for &(id, x, y) in positions {
            table.insert(Node::new(NodeId(id), format!("n{id}"), Position::flat(x, y)));
        }
        table
    }

    #[test]
    fn proximity_excludes_self_and_respects_range() {
        let table = table_with(&[(0, 0.0, 0.0), (1, 5.0, 0.0), (2, 50.0, 0.0)]);
        let mut plan = NetworkPlan::new(Default::default());

        let mut me = Node::new(NodeId(0), "n0", Position::flat(0.0, 0.0));
        me.add_interface(Interface::proximity("radio", 10.0));

        let newly_seen = me.calc_neighbors(0.0, &table, &mut plan);
        assert_eq!(newly_seen, vec![NodeId(1)]);
        assert!(me.has_neighbor(NodeId(1)));
        assert!(!me.has_neighbor(NodeId(2)));
        assert!(!me.has_neighbor(NodeId(0)), "a node is never its own neighbour");
    }

    #[test]
    fn plan_driven_interface_uses_contact_plan() {
        use pons_topology::{Contact, CoreContactPlan};

        let table = table_with(&[(0, 0.0, 0.0), (1, 0.0, 0.0)]);
        let mut plan = NetworkPlan::new(Default::default());
        plan.set_contacts(CoreContactPlan::new(
            vec![Contact::scheduled((0.0, 10.0), (NodeId(0), NodeId(1)), 1_000_000, 0.0, 0.0, 0.0)],
            false,
            false,
        ));

        let mut me = Node::new(NodeId(0), "n0", Position::flat(0.0, 0.0));
        me.add_interface(Interface::plan_driven("contact"));

        assert!(me.calc_neighbors(5.0, &table, &mut plan).contains(&NodeId(1)));
        assert!(!me.calc_neighbors(20.0, &table, &mut plan).contains(&NodeId(1)));
    }
}

#[cfg(test)]
mod send_plan {
    use pons_core::{NodeId, NodeRng, Position, BROADCAST_ADDR};
    use pons_topology::NetworkPlan;

    use crate::interface::Interface;
    use crate::node::{Node, SendOutcome};
    use crate::table::NodeTable;

    fn setup() -> (Node, NodeTable, NetworkPlan) {
        let mut table = NodeTable::new();
        table.insert(Node::new(NodeId(0), "a", Position::flat(0.0, 0.0)));
        table.insert(Node::new(NodeId(1), "b", Position::flat(5.0, 0.0)));

        let mut plan = NetworkPlan::new(Default::default());
        plan.add_node(NodeId(0), Position::flat(0.0, 0.0));
        plan.add_node(NodeId(1), Position::flat(5.0, 0.0));
        plan.add_edge(NodeId(0), NodeId(1), pons_topology::LinkProps {
            bandwidth_bps: 1_000_000,
            loss: 0.0,
            delay_secs: 0.0,
            jitter_secs: 0.0,
        });

        let mut me = Node::new(NodeId(0), "a", Position::flat(0.0, 0.0));
        me.add_interface(Interface::proximity("radio", 10.0));
        let _ = me.calc_neighbors(0.0, &table, &mut plan);

        (me, table, plan)
    }

    #[test]
    fn direct_send_to_known_neighbor_succeeds() {
        let (me, _table, mut plan) = setup();
        let mut rng = NodeRng::new(1, NodeId(0));

        let attempts = me.send_plan(0.0, NodeId(1), 1000, &mut plan, &mut rng);
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].receiver, NodeId(1));
        assert!(matches!(attempts[0].outcome, SendOutcome::Delivered { tx_time } if tx_time > 0.0 || tx_time == 0.0));
    }

    #[test]
    fn send_to_non_neighbor_yields_no_attempts() {
        let (me, _table, mut plan) = setup();
        let mut rng = NodeRng::new(1, NodeId(0));
        let attempts = me.send_plan(0.0, NodeId(99), 1000, &mut plan, &mut rng);
        assert!(attempts.is_empty());
    }

    #[test]
    fn broadcast_fans_out_to_every_neighbor() {
        let (me, _table, mut plan) = setup();
        let mut rng = NodeRng::new(1, NodeId(0));
        let attempts = me.send_plan(0.0, BROADCAST_ADDR, 1000, &mut plan, &mut rng);
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].receiver, NodeId(1));
    }

    #[test]
    fn guaranteed_loss_reports_lost_not_delivered() {
        let mut table = NodeTable::new();
        table.insert(Node::new(NodeId(0), "a", Position::flat(0.0, 0.0)));
        table.insert(Node::new(NodeId(1), "b", Position::flat(5.0, 0.0)));

        let mut plan = NetworkPlan::new(Default::default());
        plan.add_edge(NodeId(0), NodeId(1), pons_topology::LinkProps {
            bandwidth_bps: 1_000_000,
            loss: 1.0,
            delay_secs: 0.0,
            jitter_secs: 0.0,
        });

        let mut me = Node::new(NodeId(0), "a", Position::flat(0.0, 0.0));
        me.add_interface(Interface::proximity("radio", 10.0));
        let _ = me.calc_neighbors(0.0, &table, &mut plan);

        let mut rng = NodeRng::new(1, NodeId(0));
        let attempts = me.send_plan(0.0, NodeId(1), 1000, &mut plan, &mut rng);
        assert_eq!(attempts[0].outcome, SendOutcome::Lost);
    }
}

#[cfg(test)]
mod node_table {
    use pons_core::{NodeId, Position};

    use crate::node::Node;
    use crate::table::NodeTable;

    #[test]
    fn insert_and_get_round_trip() {
        let mut table = NodeTable::new();
        table.insert(Node::new(NodeId(3), "n3", Position::flat(1.0, 2.0)));
        assert_eq!(table.get(NodeId(3)).unwrap().name, "n3");
        assert!(table.get(NodeId(0)).is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn sparse_insert_skips_unfilled_slots() {
        let mut table = NodeTable::new();
        table.insert(Node::new(NodeId(5), "n5", Position::flat(0.0, 0.0)));
        assert_eq!(table.len(), 1);
        assert_eq!(table.ids().collect::<Vec<_>>(), vec![NodeId(5)]);
    }
}
