//! Message generators — scheduler tasks that originate synthetic traffic at
//! configured intervals.
//!
//! The `single` generator draws one `(src, dst)` pair (each independently
//! scalar-or-range) and originates one message; the `burst` generator
//! instead treats `src` as a range and originates one message — with its
//! own freshly sampled `dst` — for every integer source in that range.
//! [`GeneratorTask`] models this as a repeating [`pons_sched::Task`],
//! sampling every [`ValueOrRange`] field fresh on each wake from the
//! simulation's shared [`pons_core::SimRng`].

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use pons_core::{NodeId, SimTime};
use pons_message::{Payload, Sample, ValueOrRange};
use pons_sched::{NextWake, Scheduler, Task};

use crate::tasks::drain_deliveries;
use crate::world::World;

/// Whether a generator wake originates one message (`src`/`dst` each drawn
/// once) or a burst (one message per source id in `src`'s range).
#[derive(Copy, Clone, Debug)]
pub enum GeneratorKind {
    Single,
    Burst,
}

/// Configuration for one [`GeneratorTask`], sampled fresh from the shared
/// `SimRng` on every wake wherever a field is a [`ValueOrRange`].
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub kind: GeneratorKind,
    pub interval: ValueOrRange<f64>,
    /// For `Single`, a scalar id or a `[lo, hi)` range drawn once per wake.
    /// For `Burst`, every id in the range (or the one scalar id) is used as
    /// a distinct source, one message each.
    pub src: ValueOrRange<NodeId>,
    pub dst: ValueOrRange<NodeId>,
    pub size: ValueOrRange<u64>,
    pub ttl: ValueOrRange<f64>,
    pub id_prefix: String,
    /// First wake no earlier than this simulated time.
    pub start_time: f64,
    /// No message originated after this simulated time. `None` runs for the
    /// whole simulation.
    pub end_time: Option<f64>,
    pub src_service: u16,
    pub dst_service: u16,
}

/// A running message generator: repeats on `config.interval`, originating
/// one (or, for `Burst`, several) new message per wake.
pub struct GeneratorTask {
    world: Rc<RefCell<World>>,
    config: GeneratorConfig,
    seq: u64,
}

impl GeneratorTask {
    pub fn new(world: Rc<RefCell<World>>, config: GeneratorConfig) -> Self {
        GeneratorTask { world, config, seq: 0 }
    }

    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.config.id_prefix, self.seq);
        self.seq += 1;
        id
    }

    fn past_end(&self, at: f64) -> bool {
        self.config.end_time.is_some_and(|end| at > end)
    }
}

impl Task for GeneratorTask {
    fn resume(&mut self, now: SimTime, sched: &mut Scheduler) -> NextWake {
        if now.as_secs() < self.config.start_time {
            return NextWake::At(SimTime(self.config.start_time));
        }
        if self.past_end(now.as_secs()) {
            return NextWake::Done;
        }

        let srcs = match self.config.kind {
            GeneratorKind::Single => {
                let mut world = self.world.borrow_mut();
                vec![self.config.src.draw(&mut world.sim_rng)]
            }
            GeneratorKind::Burst => self.config.src.enumerate(),
        };

        for src in srcs {
            let (dst, size, ttl) = {
                let mut world = self.world.borrow_mut();
                (
                    self.config.dst.draw(&mut world.sim_rng),
                    self.config.size.draw(&mut world.sim_rng),
                    self.config.ttl.draw(&mut world.sim_rng),
                )
            };
            let id = self.next_id();
            let payload: Payload = Arc::from(vec![0u8; size as usize].into_boxed_slice());
            self.world.borrow_mut().originate(
                now,
                id,
                src,
                dst,
                self.config.src_service,
                self.config.dst_service,
                payload,
                ttl,
            );
        }

        drain_deliveries(&self.world, sched);

        let next_interval = {
            let mut world = self.world.borrow_mut();
            self.config.interval.draw(&mut world.sim_rng)
        };
        let next_at = now.offset(next_interval.max(0.0));
        if self.past_end(next_at.as_secs()) {
            return NextWake::Done;
        }
        NextWake::At(next_at)
    }
}
