//! `NetworkPlan` — a static graph composed with an optional contact plan.
//!
//! The static graph is a plain edge map keyed by a normalized node pair;
//! link properties (`bw`/`loss`/`delay`/`jitter`) are carried directly on
//! each edge.

use std::collections::{HashMap, HashSet};

use pons_core::{NodeId, Position};
use rand::{Rng, RngCore};

use crate::contact::Contact;
use crate::contact_plan::{ContactPlan, CoreContactPlan};
use crate::error::TopologyResult;

fn normalize_pair(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Static-edge link properties, defaulted when an edge carries no explicit
/// radio parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkProps {
    pub bandwidth_bps: u64,
    pub loss: f64,
    pub delay_secs: f64,
    pub jitter_secs: f64,
}

/// A static undirected graph composed with an optional scheduled contact
/// plan. Static edges shadowed by a scheduled (non-fixed) contact for the
/// same pair are removed on bind — the contact plan is authoritative there.
#[derive(Clone, Debug)]
pub struct NetworkPlan {
    positions: HashMap<NodeId, Position>,
    edges: HashMap<(NodeId, NodeId), LinkProps>,
    contact_plan: Option<CoreContactPlan>,
}

impl NetworkPlan {
    pub fn new(positions: HashMap<NodeId, Position>) -> Self {
        NetworkPlan {
            positions,
            edges: HashMap::new(),
            contact_plan: None,
        }
    }

    pub fn add_node(&mut self, id: NodeId, position: Position) {
        self.positions.insert(id, position);
    }

    pub fn position(&self, id: NodeId) -> Option<Position> {
        self.positions.get(&id).copied()
    }

    /// Add a static edge, idempotently, defaulting link properties.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, props: LinkProps) {
        self.edges.entry(normalize_pair(a, b)).or_insert(props);
    }

    pub fn has_static_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edges.contains_key(&normalize_pair(a, b))
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.positions.keys().copied()
    }

    pub fn connections(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.edges.keys().copied()
    }

    /// Install a contact plan: fixed contacts are merged in as static edges,
    /// and any static edge shadowed by a scheduled contact for the same pair
    /// is removed, matching `NetworkPlan.set_contacts`.
    pub fn set_contacts(&mut self, plan: CoreContactPlan) {
        for fixed in plan.fixed_links() {
            let key = normalize_pair(fixed.nodes.0, fixed.nodes.1);
            self.edges.entry(key).or_insert(LinkProps {
                bandwidth_bps: fixed.bandwidth_bps,
                loss: fixed.loss,
                delay_secs: fixed.delay_secs,
                jitter_secs: fixed.jitter_secs,
            });
        }
        let scheduled_pairs: HashSet<(NodeId, NodeId)> = plan
            .contacts()
            .iter()
            .filter(|c| !c.fixed)
            .map(|c| normalize_pair(c.nodes.0, c.nodes.1))
            .collect();
        for pair in scheduled_pairs {
            self.edges.remove(&pair);
        }
        self.contact_plan = Some(plan);
    }

    pub fn contact_plan(&self) -> Option<&CoreContactPlan> {
        self.contact_plan.as_ref()
    }

    pub fn fixed_links(&self) -> impl Iterator<Item = (NodeId, NodeId, LinkProps)> + '_ {
        self.edges.iter().map(|(&(a, b), &props)| (a, b, props))
    }

    pub fn next_event(&self, time: f64) -> Option<f64> {
        self.contact_plan.as_ref().and_then(|cp| cp.next_event(time))
    }

    /// Every active link at `time`: static edges plus whatever the contact
    /// plan reports.
    pub fn active_links_at(&mut self, time: f64) -> Vec<(NodeId, NodeId)> {
        let mut links: Vec<(NodeId, NodeId)> = self.edges.keys().copied().collect();
        if let Some(cp) = self.contact_plan.as_mut() {
            links.extend(cp.at(time).into_iter().map(|c| c.nodes));
        }
        links
    }

    pub fn has_contact(&mut self, time: f64, a: NodeId, b: NodeId) -> bool {
        if self.has_static_edge(a, b) {
            return true;
        }
        match self.contact_plan.as_mut() {
            Some(cp) => cp.has_contact(time, a, b),
            None => false,
        }
    }

    pub fn loss_for_contact(&mut self, time: f64, a: NodeId, b: NodeId) -> f64 {
        if let Some(props) = self.edges.get(&normalize_pair(a, b)) {
            return props.loss;
        }
        self.contact_plan
            .as_mut()
            .and_then(|cp| cp.loss_for_contact(time, a, b))
            .unwrap_or(0.0)
    }

    pub fn tx_time_for_contact(
        &mut self,
        time: f64,
        a: NodeId,
        b: NodeId,
        size: u64,
        rng: &mut dyn RngCore,
    ) -> TopologyResult<f64> {
        if let Some(props) = self.edges.get(&normalize_pair(a, b)).copied() {
            let jitter = if props.jitter_secs > 0.0 {
                rng.gen_range(-0.5..0.5) * props.jitter_secs
            } else {
                0.0
            };
            let mut tx = props.delay_secs + jitter;
            if props.bandwidth_bps > 0 {
                tx += size as f64 / props.bandwidth_bps as f64;
            }
            if tx == 0.0 {
                tx = size as f64 * crate::contact::UNBOUNDED_BW_SECS_PER_BYTE;
            }
            return Ok(tx);
        }
        match self.contact_plan.as_mut() {
            Some(cp) => cp.tx_time_for_contact(time, a, b, size, rng),
            None => Err(crate::error::TopologyError::NoContact(a, b, time)),
        }
    }

    /// All contacts active at `time`, static edges represented as
    /// always-on fixed [`Contact`]s.
    pub fn at(&mut self, time: f64) -> Vec<Contact> {
        let mut out: Vec<Contact> = self
            .edges
            .iter()
            .map(|(&(a, b), &props)| {
                Contact::fixed(
                    (a, b),
                    props.bandwidth_bps,
                    props.loss,
                    props.delay_secs,
                    props.jitter_secs,
                )
            })
            .collect();
        if let Some(cp) = self.contact_plan.as_mut() {
            out.extend(cp.at(time));
        }
        out
    }
}
