//! Unit tests for the scheduler, clock and task primitives.

#[cfg(test)]
mod scheduling {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pons_core::SimTime;

    use crate::{Clock, FnTask, NextWake, Scheduler, Task};

    struct RecordOnce {
        log: Rc<RefCell<Vec<(String, SimTime)>>>,
        tag: &'static str,
    }

    impl Task for RecordOnce {
        fn resume(&mut self, now: SimTime, _sched: &mut Scheduler) -> NextWake {
            self.log.borrow_mut().push((self.tag.to_string(), now));
            NextWake::Done
        }
    }

    #[test]
    fn fifo_within_same_instant() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut sched = Scheduler::new(Clock::virtual_time());

        sched.schedule(
            0.0,
            Box::new(RecordOnce {
                log: log.clone(),
                tag: "first",
            }),
        );
        sched.schedule(
            0.0,
            Box::new(RecordOnce {
                log: log.clone(),
                tag: "second",
            }),
        );

        sched.run_until(SimTime::ZERO).unwrap();

        let recorded = log.borrow();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].0, "first");
        assert_eq!(recorded[1].0, "second");
    }

    #[test]
    fn deadline_bounds_the_pump() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut sched = Scheduler::new(Clock::virtual_time());

        sched.schedule(
            10.0,
            Box::new(RecordOnce {
                log: log.clone(),
                tag: "late",
            }),
        );

        sched.run_until(SimTime(5.0)).unwrap();
        assert!(log.borrow().is_empty(), "task due at t=10 must not fire by t=5");

        sched.run_until(SimTime(10.0)).unwrap();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn cancelled_task_is_tombstoned() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut sched = Scheduler::new(Clock::virtual_time());

        let id = sched.schedule(
            1.0,
            Box::new(RecordOnce {
                log: log.clone(),
                tag: "cancel-me",
            }),
        );
        sched.cancel(id);
        assert!(!sched.is_scheduled(id));

        sched.run_until(SimTime(5.0)).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn repeating_task_reschedules_itself() {
        let count = Rc::new(RefCell::new(0u32));
        let mut sched = Scheduler::new(Clock::virtual_time());

        let c = count.clone();
        sched.schedule(
            1.0,
            Box::new(FnTask(move |now: SimTime, _sched: &mut Scheduler| {
                *c.borrow_mut() += 1;
                if now.as_secs() < 3.0 {
                    NextWake::At(now.offset(1.0))
                } else {
                    NextWake::Done
                }
            })),
        );

        sched.run_until(SimTime(10.0)).unwrap();
        assert_eq!(*count.borrow(), 3);
    }

    #[test]
    fn task_can_spawn_a_child_from_resume() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut sched = Scheduler::new(Clock::virtual_time());

        let child_log = log.clone();
        sched.schedule(
            0.0,
            Box::new(FnTask(move |now: SimTime, sched: &mut Scheduler| {
                let grandchild_log = child_log.clone();
                sched.spawn(Box::new(RecordOnce {
                    log: grandchild_log,
                    tag: "child",
                }));
                NextWake::Done
            })),
        );

        sched.run_until(SimTime::ZERO).unwrap();
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(log.borrow()[0].0, "child");
    }

    #[test]
    fn next_event_ignores_tombstones() {
        let mut sched = Scheduler::new(Clock::virtual_time());
        let id = sched.schedule(
            5.0,
            Box::new(FnTask(|_now: SimTime, _s: &mut Scheduler| NextWake::Done)),
        );
        assert_eq!(sched.next_event(), Some(SimTime(5.0)));
        sched.cancel(id);
        assert_eq!(sched.next_event(), None);
    }

    #[test]
    fn once_helper_runs_exactly_once() {
        let count = Rc::new(RefCell::new(0u32));
        let mut sched = Scheduler::new(Clock::virtual_time());
        let c = count.clone();
        sched.schedule(0.0, Box::new(crate::once(move |_now, _sched: &mut Scheduler| {
            *c.borrow_mut() += 1;
        })));
        sched.run_until(SimTime::ZERO).unwrap();
        assert_eq!(*count.borrow(), 1);
    }
}

#[cfg(test)]
mod clock {
    use std::time::{Duration, Instant};

    use pons_core::{RealtimeConfig, SimTime};

    use crate::Clock;

    #[test]
    fn virtual_clock_never_sleeps_or_errors() {
        let clock = Clock::virtual_time();
        assert!(!clock.is_realtime());
        clock.sync(SimTime(1_000_000.0)).unwrap();
    }

    #[test]
    fn realtime_clock_reports_as_realtime() {
        let clock = Clock::realtime(RealtimeConfig {
            factor: 1.0,
            strict: false,
        });
        assert!(clock.is_realtime());
    }

    #[test]
    fn non_strict_overrun_does_not_error() {
        let clock = Clock::Realtime {
            factor: 1.0,
            strict: false,
            wall_start: Instant::now() - Duration::from_secs(10),
        };
        // The deadline for t=0 is `wall_start`, already 10s in the past.
        // Non-strict just catches up silently.
        assert!(clock.sync(SimTime::ZERO).is_ok());
    }

    #[test]
    fn strict_overrun_past_slack_errors() {
        let clock = Clock::Realtime {
            factor: 1.0,
            strict: true,
            wall_start: Instant::now() - Duration::from_secs(10),
        };
        assert!(clock.sync(SimTime::ZERO).is_err());
    }
}
