//! xsmall — smallest demo for the PONS opportunistic-network simulator.
//!
//! Four nodes on a line (A-B-C-D), each scheduled contact open just long
//! enough to carry one hop, epidemic routing, one generator emitting a
//! steady trickle of messages from A to D. Small enough to read in one
//! sitting; meant as a worked example of wiring `pons-sim` end to end, not
//! as a realistic scenario.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use log::info;

use pons_core::{NodeId, Position, SimConfig};
use pons_message::ValueOrRange;
use pons_node::{Interface, Node, NodeTable, RouterHandle};
use pons_output::{CsvStatsWriter, EventLogWriter, SimOutputObserver, StatsExport, StatsTableWriter};
use pons_router::{Router, RouterKind, ScanMode};
use pons_sim::{GeneratorConfig, GeneratorKind, SimulatorBuilder};
use pons_topology::{Contact, CoreContactPlan, NetworkPlan};

const NODE_COUNT: u32 = 4;
const SEED: u64 = 42;
const DURATION_SECS: f64 = 600.0;
const SCAN_INTERVAL: f64 = 5.0;
const STORE_CAPACITY: u64 = 0; // unbounded for this scenario
const BANDWIDTH_BPS: u64 = 1_000_000;

fn build_nodes_and_routers() -> (NodeTable, Vec<Router>) {
    let mut table = NodeTable::new();
    let mut routers = Vec::with_capacity(NODE_COUNT as usize);
    for i in 0..NODE_COUNT {
        let mut node = Node::new(NodeId(i), format!("node-{i}"), Position::default());
        node.add_interface(Interface::plan_driven("plan0"));
        node.router = RouterHandle(i);
        table.insert(node);
        routers.push(Router::new(NodeId(i), STORE_CAPACITY, SCAN_INTERVAL, RouterKind::Epidemic, ScanMode::NeighborSync));
    }
    (table, routers)
}

/// Contacts open in a rolling window along the chain A-B-C-D so a message
/// can only cross one hop per window, forcing epidemic routing to relay it.
fn build_plan() -> NetworkPlan {
    let mut plan = NetworkPlan::new(Default::default());
    for i in 0..NODE_COUNT {
        plan.add_node(NodeId(i), Position::default());
    }
    let mut contacts = Vec::new();
    for i in 0..NODE_COUNT - 1 {
        let start = (i as f64) * 60.0;
        let end = start + 120.0;
        contacts.push(Contact::scheduled(
            (start, end),
            (NodeId(i), NodeId(i + 1)),
            BANDWIDTH_BPS,
            0.0,
            0.05,
            0.01,
        ));
    }
    plan.set_contacts(CoreContactPlan::new(contacts, true, true));
    plan
}

fn message_generator() -> GeneratorConfig {
    GeneratorConfig {
        kind: GeneratorKind::Single,
        interval: ValueOrRange::range(20.0, 40.0),
        src: ValueOrRange::scalar(NodeId(0)),
        dst: ValueOrRange::scalar(NodeId(NODE_COUNT - 1)),
        size: ValueOrRange::range(500, 2_000),
        ttl: ValueOrRange::scalar(300.0),
        id_prefix: "msg".to_string(),
        start_time: 0.0,
        end_time: Some(DURATION_SECS),
        src_service: 0,
        dst_service: 0,
    }
}

fn main() -> Result<()> {
    env_logger::init();

    println!("=== xsmall — PONS opportunistic-network simulator ===");
    println!("Nodes: {NODE_COUNT}  |  Duration: {DURATION_SECS}s  |  Seed: {SEED}");
    println!();

    let (nodes, routers) = build_nodes_and_routers();
    let plan = build_plan();
    info!("built {NODE_COUNT}-node chain topology");

    let config = SimConfig {
        start_unix_secs: 1_700_000_000,
        duration_secs: DURATION_SECS,
        seed: SEED,
        chunk_secs: 10.0,
        realtime: None,
    };

    let mut sim = SimulatorBuilder::new(config, nodes, routers)
        .plan(plan)
        .generator(message_generator())
        .build()?;

    fs::create_dir_all("output/xsmall")?;
    let log_file = fs::File::create("output/xsmall/events.log")?;
    let mut obs = SimOutputObserver::new(EventLogWriter::new(log_file));

    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        eprintln!("event log write error: {e}");
    }

    let net = sim.net_stats();
    let routing = sim.routing_stats();
    let derived = sim.derived_stats();

    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!();
    println!("{:<20} {:>10}", "net.tx", net.tx);
    println!("{:<20} {:>10}", "net.rx", net.rx);
    println!("{:<20} {:>10}", "net.drop", net.drop);
    println!("{:<20} {:>10}", "net.loss", net.loss);
    println!();
    println!("{:<20} {:>10}", "created", routing.created);
    println!("{:<20} {:>10}", "delivered", routing.delivered);
    println!("{:<20} {:>10}", "dropped", routing.dropped);
    println!("{:<20} {:>10}", "removed", routing.removed);
    println!();
    println!("{:<20} {:>10.3}", "delivery_prob", derived.delivery_prob);
    println!("{:<20} {:>10.3}", "latency_avg", derived.latency_avg);
    println!("{:<20} {:>10.3}", "hops_avg", derived.hops_avg);
    println!("{:<20} {:>10.3}", "overhead_ratio", derived.overhead_ratio);

    let export = StatsExport::new(net, routing, derived);
    let mut csv = CsvStatsWriter::new(Path::new("output/xsmall"))?;
    csv.write_row("xsmall", &export)?;
    csv.finish()?;
    println!();
    println!("Wrote output/xsmall/events.log and output/xsmall/stats.csv");

    Ok(())
}
