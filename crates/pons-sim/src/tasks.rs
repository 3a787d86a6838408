//! Scheduler tasks driving the simulator's ongoing activity: router peer
//! scans, application ticks, and the delivery of in-flight sends.
//!
//! Every task here shares the simulation's [`World`] through an
//! `Rc<RefCell<World>>` rather than owning a piece of it, since
//! `pons_sched::Task::resume` only ever hands a task `&mut Scheduler` — there
//! is no other path back into the simulator's state.

use std::cell::RefCell;
use std::rc::Rc;

use pons_core::{NodeId, SimTime};
use pons_message::Message;
use pons_sched::{once, NextWake, Scheduler, Task};

use crate::world::World;

/// Periodically recomputes `node_id`'s neighbour set, updates its router's
/// peer set, runs the PRoPHET exchange, and attempts to forward every stored
/// message — the scheduler-visible half of `World::scan_node`.
pub struct RouterScanTask {
    world: Rc<RefCell<World>>,
    node_id: NodeId,
    interval: f64,
    /// HELLO-mode peer-promotion lag; see `World::scan_node`. Empty and
    /// unused under `ScanMode::NeighborSync`.
    pending_hello: Vec<NodeId>,
}

impl RouterScanTask {
    pub fn new(world: Rc<RefCell<World>>, node_id: NodeId, interval: f64) -> Self {
        RouterScanTask { world, node_id, interval, pending_hello: Vec::new() }
    }
}

impl Task for RouterScanTask {
    fn resume(&mut self, now: SimTime, sched: &mut Scheduler) -> NextWake {
        {
            let mut world = self.world.borrow_mut();
            world.scan_node(now, self.node_id, &mut self.pending_hello);
        }
        drain_deliveries(&self.world, sched);
        NextWake::At(now.offset(self.interval.max(0.0)))
    }
}

/// Periodically calls an application's own `tick` — its interval is the
/// application's own concern (e.g. `PingApp`'s ping interval); this task just
/// provides the scheduler heartbeat.
pub struct AppTickTask {
    world: Rc<RefCell<World>>,
    node_id: NodeId,
    service: u16,
    interval: f64,
}

impl AppTickTask {
    pub fn new(world: Rc<RefCell<World>>, node_id: NodeId, service: u16, interval: f64) -> Self {
        AppTickTask { world, node_id, service, interval }
    }
}

impl Task for AppTickTask {
    fn resume(&mut self, now: SimTime, sched: &mut Scheduler) -> NextWake {
        {
            let mut world = self.world.borrow_mut();
            world.tick_app(now, self.node_id, self.service);
        }
        drain_deliveries(&self.world, sched);
        NextWake::At(now.offset(self.interval.max(0.0)))
    }
}

/// Resolve a single in-flight send: re-check the receiver is still in range,
/// then run the sender's success/failure bookkeeping and (on success) the
/// receiver's reception path.
fn deliver(world: &Rc<RefCell<World>>, now: SimTime, from: NodeId, to: NodeId, msg: Message) {
    let mut world = world.borrow_mut();
    let uid = msg.unique_id();
    let still_in_range = world.nodes.get(to).is_some_and(|n| n.still_neighbors(from));
    if !still_in_range {
        world.fail_forward(now, from, &uid, to);
        return;
    }
    world.net_stats.rx += 1;
    world.succeed_forward(now, from, &uid, to);
    world.receive_at(now, to, from, msg);
}

/// Turn every [`crate::world::PendingDelivery`] queued since the last drain
/// into a real scheduled wake-up. Called by every task after it releases its
/// `World` borrow, since `World` itself has no `&mut Scheduler` to schedule
/// with.
pub fn drain_deliveries(world: &Rc<RefCell<World>>, sched: &mut Scheduler) {
    let pending = world.borrow_mut().drain_pending();
    for p in pending {
        let world = Rc::clone(world);
        sched.schedule(
            p.delay.max(0.0),
            Box::new(once(move |now, _sched| {
                deliver(&world, now, p.from, p.to, p.msg);
            })),
        );
    }
}
