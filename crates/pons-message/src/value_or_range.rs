//! `ValueOrRange<T>` — the scalar-or-range sum type backing generator config.
//!
//! A message generator's numeric fields each take either a bare scalar or a
//! `(min, max)` tuple sampled uniformly per message. This type makes that
//! choice an explicit enum instead of a dynamic runtime check at each use
//! site.

use pons_core::{NodeId, SimRng};

/// Either a fixed `T` or a `(lo, hi)` range sampled uniformly per draw.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ValueOrRange<T> {
    Scalar(T),
    /// Inclusive on both ends.
    Range(T, T),
}

impl<T: Copy> ValueOrRange<T> {
    pub fn scalar(v: T) -> Self {
        ValueOrRange::Scalar(v)
    }

    pub fn range(lo: T, hi: T) -> Self {
        ValueOrRange::Range(lo, hi)
    }
}

/// Sampling is implemented per concrete numeric type rather than generically
/// bounded, since `u16`/`u32`/`u64`/`f64` need different uniform-sampling
/// calls and inclusive-vs-exclusive bounds differ between integers and floats.
pub trait Sample {
    fn sample(&self, rng: &mut SimRng) -> Self
    where
        Self: Sized;
}

macro_rules! impl_sample_int {
    ($t:ty) => {
        impl Sample for ValueOrRange<$t> {
            fn sample(&self, rng: &mut SimRng) -> Self {
                match *self {
                    ValueOrRange::Scalar(v) => ValueOrRange::Scalar(v),
                    ValueOrRange::Range(lo, hi) => {
                        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
                        ValueOrRange::Scalar(rng.gen_range(lo..=hi))
                    }
                }
            }
        }

        impl ValueOrRange<$t> {
            /// Draw a concrete value, collapsing a range into one sample.
            pub fn draw(&self, rng: &mut SimRng) -> $t {
                match self.sample(rng) {
                    ValueOrRange::Scalar(v) => v,
                    ValueOrRange::Range(..) => unreachable!("sample() always collapses to Scalar"),
                }
            }
        }
    };
}

impl_sample_int!(u16);
impl_sample_int!(u32);
impl_sample_int!(u64);

impl Sample for ValueOrRange<f64> {
    fn sample(&self, rng: &mut SimRng) -> Self {
        match *self {
            ValueOrRange::Scalar(v) => ValueOrRange::Scalar(v),
            ValueOrRange::Range(lo, hi) => {
                let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
                ValueOrRange::Scalar(rng.gen_range(lo..=hi))
            }
        }
    }
}

impl ValueOrRange<f64> {
    pub fn draw(&self, rng: &mut SimRng) -> f64 {
        match self.sample(rng) {
            ValueOrRange::Scalar(v) => v,
            ValueOrRange::Range(..) => unreachable!("sample() always collapses to Scalar"),
        }
    }
}

/// `NodeId` ranges are sampled (and enumerated) half-open — `[lo, hi)` —
/// for a scalar draw of `src`/`dst`. This differs from `size`/`ttl`/
/// `interval` above, which stay inclusive on both ends.
impl Sample for ValueOrRange<NodeId> {
    fn sample(&self, rng: &mut SimRng) -> Self {
        match *self {
            ValueOrRange::Scalar(v) => ValueOrRange::Scalar(v),
            ValueOrRange::Range(lo, hi) => {
                let (lo, hi) = if lo.0 <= hi.0 { (lo.0, hi.0) } else { (hi.0, lo.0) };
                let hi_inclusive = hi.saturating_sub(1).max(lo);
                ValueOrRange::Scalar(NodeId(rng.gen_range(lo..=hi_inclusive)))
            }
        }
    }
}

impl ValueOrRange<NodeId> {
    /// Draw a concrete node id, collapsing a range into one uniform sample
    /// in `[lo, hi)`.
    pub fn draw(&self, rng: &mut SimRng) -> NodeId {
        match self.sample(rng) {
            ValueOrRange::Scalar(v) => v,
            ValueOrRange::Range(..) => unreachable!("sample() always collapses to Scalar"),
        }
    }

    /// Every node id covered by this value: one element for a scalar, or
    /// every id in the half-open range `[lo, hi)` — used by the burst
    /// generator to emit one message per source in its `src` range.
    pub fn enumerate(&self) -> Vec<NodeId> {
        match *self {
            ValueOrRange::Scalar(v) => vec![v],
            ValueOrRange::Range(lo, hi) => {
                let (lo, hi) = if lo.0 <= hi.0 { (lo.0, hi.0) } else { (hi.0, lo.0) };
                (lo..hi).map(NodeId).collect()
            }
        }
    }
}
