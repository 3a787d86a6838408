//! `Clock` — the wall-clock pacing capability the scheduler depends on.
//!
//! Kept as a small capability enum rather than a trait object: there is only
//! ever one clock per scheduler and the two variants are cheap to match on.

use std::time::{Duration, Instant};

use pons_core::{RealtimeConfig, SimTime};

use crate::{SchedError, SchedResult};

/// Wall-clock slack tolerated before a `strict` realtime clock raises
/// [`SchedError::RealtimeOverrun`] — "one tick of slack" per the scheduler spec.
pub const REALTIME_SLACK_SECS: f64 = 0.1;

/// Maps simulated time to wall-clock pacing, or does nothing at all.
pub enum Clock {
    /// Runs as fast as the host can dispatch events.
    Virtual,
    /// Paces dispatch so that `factor` wall-seconds elapse per simulated
    /// second, starting from the instant the clock was created.
    Realtime {
        factor: f64,
        strict: bool,
        wall_start: Instant,
    },
}

impl Clock {
    pub fn virtual_time() -> Self {
        Clock::Virtual
    }

    pub fn realtime(config: RealtimeConfig) -> Self {
        Clock::Realtime {
            factor: config.factor,
            strict: config.strict,
            wall_start: Instant::now(),
        }
    }

    /// Called by the scheduler immediately before dispatching the event at
    /// simulated time `t`. Sleeps (non-strict or within slack) or raises
    /// [`SchedError::RealtimeOverrun`] (strict, beyond slack).
    pub fn sync(&self, t: SimTime) -> SchedResult<()> {
        let Clock::Realtime {
            factor,
            strict,
            wall_start,
        } = self
        else {
            return Ok(());
        };

        let deadline = *wall_start + Duration::from_secs_f64((factor * t.as_secs()).max(0.0));
        let now = Instant::now();
        if now < deadline {
            std::thread::sleep(deadline - now);
            return Ok(());
        }

        let overrun_secs = (now - deadline).as_secs_f64();
        if *strict && overrun_secs > REALTIME_SLACK_SECS {
            return Err(SchedError::RealtimeOverrun {
                sim_time: t.as_secs(),
                overrun_secs,
            });
        }
        // Non-strict, or within slack: catch up without sleeping.
        Ok(())
    }

    pub fn is_realtime(&self) -> bool {
        matches!(self, Clock::Realtime { .. })
    }
}
