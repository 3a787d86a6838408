//! Unit tests for contact plans, loaders and network plans.

#[cfg(test)]
mod contact_plan {
    use pons_core::{NodeId, SimRng};

    use crate::contact::Contact;
    use crate::contact_plan::{ContactPlan, CoreContactPlan};

    fn n(id: u32) -> NodeId {
        NodeId(id)
    }

    fn sample_plan() -> CoreContactPlan {
        CoreContactPlan::new(
            vec![
                Contact::scheduled((0.0, 10.0), (n(1), n(2)), 1_000_000, 0.0, 0.1, 0.0),
                Contact::scheduled((20.0, 30.0), (n(1), n(2)), 1_000_000, 0.0, 0.1, 0.0),
                Contact::fixed((n(3), n(4)), 500_000, 0.0, 0.2, 0.0),
            ],
            false,
            false,
        )
    }

    #[test]
    fn at_returns_active_and_fixed_contacts() {
        let mut plan = sample_plan();
        let active = plan.at(5.0);
        assert_eq!(active.len(), 2); // the 0-10 contact plus the fixed one
        assert!(active.iter().any(|c| c.fixed));
    }

    #[test]
    fn at_excludes_contacts_outside_window() {
        let mut plan = sample_plan();
        let active = plan.at(15.0);
        assert_eq!(active.len(), 1); // only the fixed contact
        assert!(active[0].fixed);
    }

    #[test]
    fn cache_hits_on_repeated_query() {
        let mut plan = sample_plan();
        let first = plan.at(5.0);
        let second = plan.at(5.0);
        assert_eq!(first, second);
    }

    #[test]
    fn has_contact_checks_both_orderings() {
        let mut plan = sample_plan();
        assert!(plan.has_contact(5.0, n(1), n(2)));
        assert!(plan.has_contact(5.0, n(2), n(1)));
        assert!(!plan.has_contact(15.0, n(1), n(2)));
    }

    #[test]
    fn next_event_is_strict_minimum_after_time() {
        let plan = sample_plan();
        assert_eq!(plan.next_event(5.0), Some(10.0));
        assert_eq!(plan.next_event(10.0), Some(20.0));
        assert_eq!(plan.next_event(30.0), None);
    }

    #[test]
    fn tx_time_for_contact_uses_bandwidth_and_delay() {
        let mut plan = sample_plan();
        let mut rng = SimRng::new(1);
        let tx = plan.tx_time_for_contact(5.0, n(1), n(2), 1_000_000, &mut rng).unwrap();
        // 1MB over 1Mbps plus 0.1s delay, no jitter.
        assert!((tx - 1.1).abs() < 1e-9);
    }

    #[test]
    fn tx_time_for_contact_errors_without_a_contact() {
        let mut plan = sample_plan();
        let mut rng = SimRng::new(1);
        assert!(plan.tx_time_for_contact(15.0, n(1), n(2), 100, &mut rng).is_err());
    }

    #[test]
    fn unbounded_bandwidth_uses_per_byte_floor() {
        let mut plan = CoreContactPlan::new(
            vec![Contact::scheduled((0.0, 10.0), (n(1), n(2)), 0, 0.0, 0.0, 0.0)],
            false,
            false,
        );
        let mut rng = SimRng::new(1);
        let tx = plan.tx_time_for_contact(1.0, n(1), n(2), 1000, &mut rng).unwrap();
        assert!((tx - 1000.0 * crate::contact::UNBOUNDED_BW_SECS_PER_BYTE).abs() < 1e-12);
    }

    #[test]
    fn loop_mode_wraps_queries_into_max_end() {
        // max_end is driven by the (5,6) contact's end=10; the (1,2) contact
        // only spans [0,3] within that cycle.
        let mut plan = CoreContactPlan::new(
            vec![
                Contact::scheduled((0.0, 3.0), (n(1), n(2)), 1_000_000, 0.0, 0.0, 0.0),
                Contact::scheduled((0.0, 10.0), (n(5), n(6)), 1_000_000, 0.0, 0.0, 0.0),
            ],
            true,
            false,
        );
        assert!(plan.has_contact(2.0, n(1), n(2)));
        assert!(plan.has_contact(12.0, n(1), n(2))); // 12 % 10 == 2, still within [0,3]
        assert!(!plan.has_contact(19.0, n(1), n(2))); // 19 % 10 == 9, past [0,3]
    }

    #[test]
    fn symmetric_plan_accepts_reversed_order_query() {
        let mut plan = CoreContactPlan::new(
            vec![Contact::scheduled((0.0, 10.0), (n(1), n(2)), 1_000_000, 0.0, 0.0, 0.0)],
            false,
            true,
        );
        assert!(plan.has_contact(5.0, n(2), n(1)));
    }
}

#[cfg(test)]
mod plan_formats {
    use std::collections::HashMap;
    use std::io::Cursor;

    use crate::plan_formats::{load_core_reader, load_csv_reader, load_json_str, parse_bandwidth};

    #[test]
    fn bandwidth_parses_suffixed_units() {
        assert_eq!(parse_bandwidth("10mbit").unwrap(), 10_000_000);
        assert_eq!(parse_bandwidth("5kbit").unwrap(), 5_000);
        assert_eq!(parse_bandwidth("2gbit").unwrap(), 2_000_000_000);
        assert_eq!(parse_bandwidth("42").unwrap(), 42);
    }

    #[test]
    fn core_format_parses_contact_and_fixed_lines() {
        let text = "s loop 1\n\
                     a contact 0 100 1 2 10mbit 0.0 0.1 0.01\n\
                     a fixed 1 3 5mbit 0.0 0.2 0.0\n\
                     # a comment line\n";
        let (contacts, loop_mode) = load_core_reader(Cursor::new(text), &HashMap::new(), false).unwrap();
        assert!(loop_mode);
        assert_eq!(contacts.len(), 2);
        assert!(contacts.iter().any(|c| c.fixed));
        assert!(contacts.iter().any(|c| !c.fixed && c.bandwidth_bps == 10_000_000));
    }

    #[test]
    fn csv_format_detects_aliased_columns() {
        let csv_text = "src,dst,start,end,bw,loss,delay,jitter\n1,2,0,10,10mbit,0.0,0.1,0.0\n";
        let contacts = load_csv_reader(Cursor::new(csv_text), &HashMap::new()).unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].bandwidth_bps, 10_000_000);
    }

    #[test]
    fn csv_negative_end_time_marks_fixed() {
        let csv_text = "node1,node2,start_time,end_time\n1,2,0,-1\n";
        let contacts = load_csv_reader(Cursor::new(csv_text), &HashMap::new()).unwrap();
        assert!(contacts[0].fixed);
    }

    #[test]
    fn json_format_parses_array_of_objects() {
        let json = r#"[{"node1": 1, "node2": 2, "start_time": 0, "end_time": 10, "bandwidth": 1000000}]"#;
        let contacts = load_json_str(json, &HashMap::new()).unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].bandwidth_bps, 1_000_000);
    }

    #[test]
    fn json_symmetric_flag_adds_reverse_contact() {
        let json = r#"[{"node1": 1, "node2": 2, "start_time": 0, "end_time": 10, "symmetric": true}]"#;
        let contacts = load_json_str(json, &HashMap::new()).unwrap();
        assert_eq!(contacts.len(), 2);
    }
}

#[cfg(test)]
mod network_plan {
    use std::collections::HashMap;

    use pons_core::{NodeId, Position, SimRng};

    use crate::contact::Contact;
    use crate::contact_plan::CoreContactPlan;
    use crate::network_plan::{LinkProps, NetworkPlan};

    fn n(id: u32) -> NodeId {
        NodeId(id)
    }

    #[test]
    fn static_edge_without_contact_plan_is_always_active() {
        let mut plan = NetworkPlan::new(HashMap::new());
        plan.add_edge(n(1), n(2), LinkProps::default());
        assert!(plan.has_contact(0.0, n(1), n(2)));
        assert!(plan.has_contact(1_000_000.0, n(1), n(2)));
    }

    #[test]
    fn scheduled_contact_shadows_static_edge_for_same_pair() {
        let mut plan = NetworkPlan::new(HashMap::new());
        plan.add_edge(n(1), n(2), LinkProps::default());

        let cp = CoreContactPlan::new(
            vec![Contact::scheduled((0.0, 10.0), (n(1), n(2)), 1_000_000, 0.0, 0.0, 0.0)],
            false,
            false,
        );
        plan.set_contacts(cp);

        assert!(!plan.has_static_edge(n(1), n(2)));
        assert!(plan.has_contact(5.0, n(1), n(2)));
        assert!(!plan.has_contact(15.0, n(1), n(2)));
    }

    #[test]
    fn fixed_contact_is_merged_in_as_a_static_edge() {
        let mut plan = NetworkPlan::new(HashMap::new());
        let cp = CoreContactPlan::new(vec![Contact::fixed((n(3), n(4)), 0, 0.0, 0.0, 0.0)], false, false);
        plan.set_contacts(cp);
        assert!(plan.has_static_edge(n(3), n(4)));
        assert!(plan.has_contact(123.0, n(3), n(4)));
    }

    #[test]
    fn node_positions_round_trip() {
        let mut plan = NetworkPlan::new(HashMap::new());
        plan.add_node(n(1), Position::flat(1.0, 2.0));
        assert_eq!(plan.position(n(1)), Some(Position::flat(1.0, 2.0)));
        assert_eq!(plan.position(n(2)), None);
    }

    #[test]
    fn tx_time_falls_back_to_contact_plan_when_no_static_edge() {
        let mut plan = NetworkPlan::new(HashMap::new());
        let cp = CoreContactPlan::new(
            vec![Contact::scheduled((0.0, 10.0), (n(1), n(2)), 1_000_000, 0.0, 0.1, 0.0)],
            false,
            false,
        );
        plan.set_contacts(cp);
        let mut rng = SimRng::new(1);
        let tx = plan.tx_time_for_contact(5.0, n(1), n(2), 1_000_000, &mut rng).unwrap();
        assert!((tx - 1.1).abs() < 1e-9);
    }
}
