//! Fluent builder for constructing a [`Simulator`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use pons_app::Application;
use pons_core::{NodeId, SimConfig};
use pons_node::{NodeTable, RouterHandle};
use pons_router::Router;
use pons_sched::{Clock, Scheduler};
use pons_topology::NetworkPlan;

use crate::generators::GeneratorConfig;
use crate::generators::GeneratorTask;
use crate::tasks::{AppTickTask, RouterScanTask};
use crate::world::World;
use crate::{SimError, SimResult, Simulator};

/// Fluent builder for [`Simulator`].
///
/// # Required inputs
///
/// - [`SimConfig`] — duration, seed, chunk size, realtime pacing
/// - [`NodeTable`] — every node in the run, each already carrying a
///   [`RouterHandle`] into `routers`
/// - `Vec<Router>` — one entry per distinct router, indexed by
///   [`RouterHandle`]
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                          |
/// |-------------------|-----------------------------------|
/// | `.plan(p)`        | An empty [`NetworkPlan`]          |
/// | `.app(..)`        | No applications registered        |
/// | `.generator(..)`  | No message generators             |
pub struct SimulatorBuilder {
    config: SimConfig,
    nodes: NodeTable,
    routers: Vec<Router>,
    plan: Option<NetworkPlan>,
    apps: Vec<(NodeId, Box<dyn Application>, f64)>,
    generators: Vec<GeneratorConfig>,
}

impl SimulatorBuilder {
    pub fn new(config: SimConfig, nodes: NodeTable, routers: Vec<Router>) -> Self {
        SimulatorBuilder {
            config,
            nodes,
            routers,
            plan: None,
            apps: Vec::new(),
            generators: Vec::new(),
        }
    }

    /// Supply the static/contact topology. If not called, nodes never come
    /// into contact unless their interfaces are proximity-based.
    pub fn plan(mut self, plan: NetworkPlan) -> Self {
        self.plan = Some(plan);
        self
    }

    /// Register an application at `node`, driven by an [`AppTickTask`] every
    /// `tick_interval` simulated seconds (pass `0.0` for a purely reactive
    /// application that never needs its own timer).
    pub fn app(mut self, node: NodeId, app: Box<dyn Application>, tick_interval: f64) -> Self {
        self.apps.push((node, app, tick_interval));
        self
    }

    /// Add a message generator.
    pub fn generator(mut self, config: GeneratorConfig) -> Self {
        self.generators.push(config);
        self
    }

    /// Validate inputs, wire up every scan/tick/generator task, and return a
    /// ready-to-run [`Simulator`].
    pub fn build(self) -> SimResult<Simulator> {
        if self.nodes.is_empty() {
            return Err(SimError::Config("simulator requires at least one node".to_string()));
        }
        for (node, _, _) in &self.apps {
            if self.nodes.get(*node).is_none() {
                return Err(SimError::Config(format!("app registered at unknown node {node}")));
            }
        }

        let scan_intervals: Vec<(NodeId, f64)> = self
            .nodes
            .nodes()
            .filter_map(|n| {
                let handle = n.router;
                if handle == RouterHandle::INVALID {
                    None
                } else {
                    Some((n.id, self.routers[handle.index()].core.scan_interval))
                }
            })
            .collect();

        let plan = self.plan.unwrap_or_else(|| NetworkPlan::new(HashMap::new()));
        let mut world = World::new(self.nodes, self.routers, plan, self.config.seed);

        let mut app_ticks = Vec::with_capacity(self.apps.len());
        for (node, app, interval) in self.apps {
            let service = app.service();
            world.register_app(node, app);
            app_ticks.push((node, service, interval));
        }

        let clock = match self.config.realtime {
            Some(rt) => Clock::realtime(rt),
            None => Clock::virtual_time(),
        };
        let mut sched = Scheduler::new(clock);
        let world = Rc::new(RefCell::new(world));

        for (node_id, interval) in scan_intervals {
            if interval > 0.0 {
                sched.spawn(Box::new(RouterScanTask::new(Rc::clone(&world), node_id, interval)));
            }
        }
        for (node_id, service, interval) in app_ticks {
            if interval > 0.0 {
                sched.spawn(Box::new(AppTickTask::new(Rc::clone(&world), node_id, service, interval)));
            }
        }
        for config in self.generators {
            let delay = config.start_time.max(0.0);
            sched.schedule(delay, Box::new(GeneratorTask::new(Rc::clone(&world), config)));
        }

        Ok(Simulator { config: self.config, sched, world })
    }
}
