//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a continuous `SimTime` (seconds, `f64`) rather than
//! an integer tick: contact windows, transmission durations and jitter are
//! all sub-second-accurate real quantities, and the scheduler advances from
//! event to event rather than stepping a fixed-size tick. `SimTime` wraps an
//! `f64` and supplies a total order (simulation times are always finite, so
//! `PartialOrd`/`Ord` can be derived from `total_cmp` without the usual NaN
//! caveats).

use std::cmp::Ordering;
use std::fmt;

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute point in simulated time, in seconds since the run started.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    #[inline]
    pub fn offset(self, secs: f64) -> SimTime {
        SimTime(self.0 + secs)
    }

    /// Seconds elapsed from `earlier` to `self`.
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        self.0 - earlier.0
    }

    #[inline]
    pub fn as_secs(self) -> f64 {
        self.0
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::ops::Add<f64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: f64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.0 - rhs.0
    }
}

impl From<f64> for SimTime {
    fn from(secs: f64) -> Self {
        SimTime(secs)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.3}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between simulated seconds and Unix wall-clock time.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Unix timestamp (seconds since epoch) of `SimTime::ZERO`.
    pub start_unix_secs: i64,
    /// The current simulated time, advanced by the scheduler.
    pub current: SimTime,
}

impl SimClock {
    pub fn new(start_unix_secs: i64) -> Self {
        Self {
            start_unix_secs,
            current: SimTime::ZERO,
        }
    }

    #[inline]
    pub fn advance_to(&mut self, t: SimTime) {
        debug_assert!(t >= self.current, "simulated time must not move backwards");
        self.current = t;
    }

    #[inline]
    pub fn current_unix_secs(&self) -> i64 {
        self.start_unix_secs + self.current.0 as i64
    }

    /// Break elapsed time into (day, hour, minute) components from sim start.
    pub fn elapsed_dhm(&self) -> (u64, u32, u32) {
        let total_secs = self.current.0.max(0.0) as u64;
        let days = total_secs / 86_400;
        let hours = ((total_secs % 86_400) / 3_600) as u32;
        let minutes = ((total_secs % 3_600) / 60) as u32;
        (days, hours, minutes)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (d, h, m) = self.elapsed_dhm();
        write!(f, "{} (day {} {:02}:{:02})", self.current, d, h, m)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration, typically loaded from a config file
/// by the application crate and passed to the simulator builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Unix timestamp for `SimTime::ZERO`.
    pub start_unix_secs: i64,

    /// Total simulated duration, in seconds.
    pub duration_secs: f64,

    /// Master RNG seed. The same seed always produces identical statistics.
    pub seed: u64,

    /// How often (in simulated seconds) the scheduler yields back to the
    /// simulator facade for progress reporting / abort checks / snapshotting.
    pub chunk_secs: f64,

    /// Realtime pacing, if any. `None` runs as fast as possible.
    pub realtime: Option<RealtimeConfig>,
}

/// Wall-clock pacing parameters for `Clock::Realtime`.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RealtimeConfig {
    /// Wall seconds per simulated second.
    pub factor: f64,
    /// If true, an overshoot beyond one chunk's worth of slack is an error
    /// rather than a silent catch-up.
    pub strict: bool,
}

impl SimConfig {
    #[inline]
    pub fn end_time(&self) -> SimTime {
        SimTime(self.duration_secs)
    }

    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_unix_secs)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_unix_secs: 0,
            duration_secs: 3600.0,
            seed: 0,
            chunk_secs: 5.0,
            realtime: None,
        }
    }
}
