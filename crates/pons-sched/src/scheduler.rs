//! The min-heap event scheduler.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use pons_core::SimTime;

use crate::clock::Clock;
use crate::error::SchedResult;
use crate::task::{NextWake, Task, TaskId};

/// One pending wake-up: `(time, seq)` orders entries so that, at equal
/// simulated time, the earlier-enqueued entry runs first — a
/// FIFO-within-an-instant guarantee.
struct HeapEntry {
    time: SimTime,
    seq: u64,
    id: TaskId,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time.cmp(&other.time).then(self.seq.cmp(&other.seq))
    }
}

/// Single-threaded, cooperative discrete-event scheduler.
///
/// Owns every live [`Task`] in a slab keyed by [`TaskId`] and a min-heap of
/// `(time, seq, id)` wake-ups. Popping an entry whose id is no longer present
/// in the slab is a no-op: that is what cancellation looks like — a
/// tombstoned entry silently discarded on pop, per the scheduler spec. No
/// task is ever preempted mid-`resume`.
pub struct Scheduler {
    clock: Clock,
    now: SimTime,
    heap: BinaryHeap<Reverse<HeapEntry>>,
    tasks: HashMap<TaskId, Box<dyn Task>>,
    next_id: u64,
    next_seq: u64,
}

impl Scheduler {
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            now: SimTime::ZERO,
            heap: BinaryHeap::new(),
            tasks: HashMap::new(),
            next_id: 0,
            next_seq: 0,
        }
    }

    /// The scheduler's current simulated time. Monotonic non-decreasing
    /// within a `run_until` call.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn is_realtime(&self) -> bool {
        self.clock.is_realtime()
    }

    /// Enqueue `task` to run at `now() + delay` (`delay` must be `>= 0`).
    pub fn schedule(&mut self, delay: f64, task: Box<dyn Task>) -> TaskId {
        debug_assert!(delay >= 0.0, "schedule delay must be non-negative");
        let id = self.fresh_id();
        let at = self.now.offset(delay.max(0.0));
        self.tasks.insert(id, task);
        self.push_heap(at, id);
        id
    }

    /// Enqueue `task` to run at `now()`, with a fresh sequence number (so it
    /// still runs after any task already queued for the current instant).
    pub fn spawn(&mut self, task: Box<dyn Task>) -> TaskId {
        self.schedule(0.0, task)
    }

    /// Drop a task. Its already-queued heap entries become tombstones and
    /// are silently skipped when popped.
    pub fn cancel(&mut self, id: TaskId) {
        self.tasks.remove(&id);
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    /// The time of the next pending wake-up, or `None` if the queue is empty
    /// (ignoring tombstoned entries still physically in the heap).
    pub fn next_event(&self) -> Option<SimTime> {
        self.heap
            .iter()
            .filter(|Reverse(e)| self.tasks.contains_key(&e.id))
            .map(|Reverse(e)| e.time)
            .min()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Pop and resume tasks while the next wake-up is `<= deadline`. Stops
    /// when the heap holds nothing at or before `deadline`.
    pub fn run_until(&mut self, deadline: SimTime) -> SchedResult<()> {
        loop {
            match self.heap.peek() {
                Some(Reverse(entry)) if entry.time <= deadline => {}
                _ => break,
            }
            let Reverse(entry) = self.heap.pop().expect("peeked Some above");

            // Tombstone: task was cancelled since this entry was queued.
            let Some(mut task) = self.tasks.remove(&entry.id) else {
                continue;
            };

            self.now = entry.time;
            self.clock.sync(self.now)?;

            match task.resume(self.now, self) {
                NextWake::Done => {}
                NextWake::At(t) => {
                    let at = if t > self.now { t } else { self.now };
                    self.tasks.insert(entry.id, task);
                    self.push_heap(at, entry.id);
                }
            }
        }
        Ok(())
    }

    fn fresh_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push_heap(&mut self, time: SimTime, id: TaskId) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(HeapEntry { time, seq, id }));
    }
}
