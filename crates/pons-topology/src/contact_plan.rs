//! `ContactPlan` trait and its `CoreContactPlan` implementation.
//!
//! `CoreContactPlan::at()` keeps a single-slot cache (hit only on an exact
//! repeat of the same query time) and, for a non-looping plan, runs a
//! periodic `clean()` sweep triggered when `time` lands on a tenth of the
//! plan's maximum end time. A looping plan never sweeps: a contact dropped
//! as "past" would otherwise vanish from every later cycle too.

use pons_core::NodeId;
use rand::{Rng, RngCore};

use crate::contact::{Contact, UNBOUNDED_BW_SECS_PER_BYTE};
use crate::error::{TopologyError, TopologyResult};

/// Shared behaviour of every contact-plan backend.
///
/// `CoreContactPlan` is the one concrete implementation; the CSV/JSON/ION
/// loaders in [`crate::plan_formats`] all produce a `Vec<Contact>` that is
/// handed to `CoreContactPlan::new`, so every file format ends up sharing
/// this same in-memory representation and caching behaviour.
pub trait ContactPlan {
    /// Contacts active at `time` (fixed contacts are always included).
    fn at(&mut self, time: f64) -> Vec<Contact>;

    /// Earliest contact-plan transition strictly after `time`, across every
    /// contact's start and end, or `None` if nothing is scheduled later.
    fn next_event(&self, time: f64) -> Option<f64>;

    fn has_contact(&mut self, time: f64, a: NodeId, b: NodeId) -> bool;

    fn loss_for_contact(&mut self, time: f64, a: NodeId, b: NodeId) -> Option<f64>;

    fn tx_time_for_contact(
        &mut self,
        time: f64,
        a: NodeId,
        b: NodeId,
        size: u64,
        rng: &mut dyn RngCore,
    ) -> TopologyResult<f64>;

    fn fixed_links(&self) -> Vec<Contact>;
}

/// A contact plan held entirely in memory, ordered by `start`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoreContactPlan {
    contacts: Vec<Contact>,
    pub loop_mode: bool,
    pub symmetric: bool,
    max_end: f64,

    // `at()` memoisation: last query time and its resulting contact list.
    #[cfg_attr(feature = "serde", serde(skip))]
    last_at: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip))]
    last_cache: Vec<Contact>,
}

impl CoreContactPlan {
    pub fn new(mut contacts: Vec<Contact>, loop_mode: bool, symmetric: bool) -> Self {
        contacts.sort_by(|a, b| a.timespan.0.total_cmp(&b.timespan.0));
        let max_end = contacts
            .iter()
            .filter(|c| !c.fixed)
            .map(|c| c.timespan.1)
            .fold(0.0_f64, f64::max);
        CoreContactPlan {
            contacts,
            loop_mode,
            symmetric,
            max_end,
            last_at: None,
            last_cache: Vec::new(),
        }
    }

    pub fn max_end(&self) -> f64 {
        self.max_end
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Wrap `time` into `[0, max_end)` when looping, so every query
    /// rewrites `time` the same way. A query landing exactly on `max_end`
    /// still reports the contact ending there rather than wrapping to `0`.
    fn normalize(&self, time: f64) -> f64 {
        if self.loop_mode && self.max_end > 0.0 && time > self.max_end {
            time % self.max_end
        } else {
            time
        }
    }

    /// Drop contacts that ended before `time`. Fixed contacts never expire.
    fn clean(&mut self, time: f64) {
        self.contacts.retain(|c| c.fixed || c.timespan.1 >= time);
    }

    /// `Contact::connects` already matches a pair regardless of which side
    /// is `node1`/`node2`; `symmetric` governs only whether the *loader*
    /// emitted an explicit reverse duplicate for a plan whose individual
    /// lines are one-directional by convention.
    fn lookup(&mut self, time: f64, a: NodeId, b: NodeId) -> Option<Contact> {
        self.at(time).into_iter().find(|c| c.connects(a, b))
    }
}

impl ContactPlan for CoreContactPlan {
    fn at(&mut self, time: f64) -> Vec<Contact> {
        let time = self.normalize(time);

        if self.last_at == Some(time) {
            return self.last_cache.clone();
        }

        let matches: Vec<Contact> = self.contacts.iter().copied().filter(|c| c.active_at(time)).collect();
        self.last_at = Some(time);
        self.last_cache = matches.clone();

        if !self.loop_mode && self.max_end > 0.0 {
            let tenth = self.max_end / 10.0;
            if tenth > 0.0 && (time % tenth).abs() < f64::EPSILON {
                self.clean(time);
            }
        }

        matches
    }

    fn next_event(&self, time: f64) -> Option<f64> {
        let time = self.normalize(time);
        self.contacts
            .iter()
            .filter(|c| !c.fixed)
            .flat_map(|c| [c.timespan.0, c.timespan.1])
            .filter(|t| *t > time)
            .fold(None, |acc, t| Some(acc.map_or(t, |m: f64| m.min(t))))
    }

    fn has_contact(&mut self, time: f64, a: NodeId, b: NodeId) -> bool {
        self.lookup(time, a, b).is_some()
    }

    fn loss_for_contact(&mut self, time: f64, a: NodeId, b: NodeId) -> Option<f64> {
        self.lookup(time, a, b).map(|c| c.loss)
    }

    fn tx_time_for_contact(
        &mut self,
        time: f64,
        a: NodeId,
        b: NodeId,
        size: u64,
        rng: &mut dyn RngCore,
    ) -> TopologyResult<f64> {
        let contact = self
            .lookup(time, a, b)
            .ok_or(TopologyError::NoContact(a, b, time))?;

        let tx = if contact.bandwidth_bps == 0 {
            size as f64 * UNBOUNDED_BW_SECS_PER_BYTE
        } else {
            size as f64 / contact.bandwidth_bps as f64
        };
        let jitter = if contact.jitter_secs > 0.0 {
            rng.gen_range(-0.5..0.5) * contact.jitter_secs
        } else {
            0.0
        };
        Ok(tx + contact.delay_secs + jitter)
    }

    fn fixed_links(&self) -> Vec<Contact> {
        self.contacts.iter().copied().filter(|c| c.fixed).collect()
    }
}
