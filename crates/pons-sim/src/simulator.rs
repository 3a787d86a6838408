//! `Simulator` — the chunked pump loop tying every PONS crate together.

use std::cell::RefCell;
use std::rc::Rc;

use pons_core::{SimConfig, SimTime};
use pons_sched::Scheduler;

use crate::observer::SimObserver;
use crate::stats::{DerivedStats, NetStats, RoutingStats};
use crate::world::World;
use crate::SimResult;

/// Drives a PONS simulation from `t = 0` to `config.duration_secs`.
///
/// Unlike a fixed-tick loop, the underlying [`Scheduler`] advances from
/// event to event; [`Simulator::run`] only imposes a chunk boundary every
/// `config.chunk_secs` simulated seconds so an [`SimObserver`] gets regular
/// progress callbacks without every task needing to know about it.
///
/// Create via [`crate::SimulatorBuilder`].
pub struct Simulator {
    pub(crate) config: SimConfig,
    pub(crate) sched: Scheduler,
    pub(crate) world: Rc<RefCell<World>>,
}

impl Simulator {
    /// Run to completion, feeding every recorded [`crate::observer::SimEvent`]
    /// and chunk/end-of-run hook to `observer` as it goes.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let end = self.config.end_time();
        let mut now = SimTime::ZERO;

        while now < end {
            let deadline = SimTime((now.as_secs() + self.config.chunk_secs).min(end.as_secs()));
            self.sched.run_until(deadline)?;

            let events = self.world.borrow_mut().drain_events();
            for (t, event) in events {
                observer.on_event(t, &event);
            }
            observer.on_chunk(deadline);
            now = deadline;
        }

        let stats = self.world.borrow().routing_stats.derived();
        observer.on_sim_end(now, &stats);
        Ok(())
    }

    /// Run exactly `duration` simulated seconds further, beyond whatever has
    /// already elapsed. Useful for tests and incremental stepping.
    pub fn run_for<O: SimObserver>(&mut self, duration: f64, observer: &mut O) -> SimResult<()> {
        let deadline = SimTime(self.sched.now().as_secs() + duration.max(0.0));
        self.sched.run_until(deadline)?;
        let events = self.world.borrow_mut().drain_events();
        for (t, event) in events {
            observer.on_event(t, &event);
        }
        observer.on_chunk(deadline);
        Ok(())
    }

    pub fn net_stats(&self) -> NetStats {
        self.world.borrow().net_stats
    }

    pub fn routing_stats(&self) -> RoutingStats {
        self.world.borrow().routing_stats
    }

    pub fn derived_stats(&self) -> DerivedStats {
        self.world.borrow().routing_stats.derived()
    }

    pub fn world(&self) -> Rc<RefCell<World>> {
        Rc::clone(&self.world)
    }
}
