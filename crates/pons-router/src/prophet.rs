//! PRoPHET predictability state.
//!
//! `pred[x]` estimates this node's delivery likelihood to `x`; it is raised
//! on direct encounter, decayed by `gamma` over elapsed time, and
//! propagated transitively through whatever table a peer last advertised.

use std::collections::HashMap;

use pons_core::NodeId;

/// Tunables for the PRoPHET predictability update. Defaults match the
/// commonly cited PRoPHET parameterisation.
#[derive(Clone, Copy, Debug)]
pub struct ProphetConfig {
    /// `pred[peer]` assigned on a first-ever encounter.
    pub p_encounter_first: f64,
    /// Below this, an encounter is treated as "first" even if a decayed
    /// entry already exists.
    pub p_first_threshold: f64,
    /// Growth factor applied to an existing `pred[peer]` on re-encounter.
    pub p_encounter: f64,
    /// Small constant subtracted from 1 in the re-encounter update.
    pub delta: f64,
    /// Per-second decay factor applied to every other entry on encounter.
    pub gamma: f64,
    /// Transitivity scaling factor.
    pub beta: f64,
}

impl Default for ProphetConfig {
    fn default() -> Self {
        ProphetConfig {
            p_encounter_first: 0.75,
            p_first_threshold: 0.1,
            p_encounter: 0.7,
            delta: 0.01,
            gamma: 0.98,
            beta: 0.25,
        }
    }
}

/// Per-router predictability table, plus a cache of the last table each peer
/// advertised (used by the forwarding decision in [`crate::kind::Router::forward`]).
pub struct ProphetState {
    self_id: NodeId,
    config: ProphetConfig,
    pred: HashMap<NodeId, f64>,
    peer_tables: HashMap<NodeId, HashMap<NodeId, f64>>,
    last_update: f64,
}

impl ProphetState {
    pub fn new(self_id: NodeId, config: ProphetConfig) -> Self {
        ProphetState {
            self_id,
            config,
            pred: HashMap::new(),
            peer_tables: HashMap::new(),
            last_update: 0.0,
        }
    }

    pub fn pred(&self, node: NodeId) -> f64 {
        *self.pred.get(&node).unwrap_or(&0.0)
    }

    pub fn table_snapshot(&self) -> HashMap<NodeId, f64> {
        self.pred.clone()
    }

    /// The predictability `peer` last advertised for reaching `dst`, or
    /// `0.0` if `peer` has never advertised a table.
    pub fn peer_pred(&self, peer: NodeId, dst: NodeId) -> f64 {
        self.peer_tables.get(&peer).and_then(|t| t.get(&dst)).copied().unwrap_or(0.0)
    }

    /// Called when this router meets `peer` at `now`, given the table `peer`
    /// advertises. Updates `pred[peer]`, ages every *other* entry by
    /// `gamma^dt`, then runs the transitive update against `peer`'s table.
    ///
    /// Aging applies to every key except `self_id` and the just-met `peer`,
    /// since aging the very encounter that refreshes an entry would
    /// immediately undo the refresh.
    pub fn on_peer_encounter(&mut self, peer: NodeId, now: f64, peer_table: &HashMap<NodeId, f64>) {
        let dt = (now - self.last_update).max(0.0);
        self.last_update = now;

        let decay = self.config.gamma.powf(dt);
        for (&x, v) in self.pred.iter_mut() {
            if x != self.self_id && x != peer {
                *v *= decay;
            }
        }

        let prior = self.pred(peer);
        let updated = if prior < self.config.p_first_threshold {
            self.config.p_encounter_first
        } else {
            prior + (1.0 - self.config.delta - prior) * self.config.p_encounter
        };
        self.pred.insert(peer, updated);

        for (&x, &p_at_x) in peer_table {
            if x == self.self_id {
                continue;
            }
            let candidate = updated * p_at_x * self.config.beta;
            let entry = self.pred.entry(x).or_insert(0.0);
            if candidate > *entry {
                *entry = candidate;
            }
        }

        self.peer_tables.insert(peer, peer_table.clone());
    }
}
