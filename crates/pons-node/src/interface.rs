//! Node interfaces — named attachment points, each driving one `NeighborSet`.

use pons_core::NodeId;

/// How an interface decides who its neighbours are.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterfaceKind {
    /// Proximity-based: neighbours are nodes within `range_m`, recomputed
    /// from node positions every tick. The `default_*` fields govern
    /// tx-time/loss math for this interface when no `NetworkPlan` contact
    /// entry exists for the pair (a bare radio with no scheduled plan).
    Proximity {
        range_m: f64,
        default_bw_bps: u64,
        default_loss: f64,
        default_delay_secs: f64,
    },
    /// Plan-driven: neighbours come from a `NetworkPlan`'s `has_contact`
    /// query; tx-time and loss also come from the plan.
    Plan,
}

/// The set of nodes currently reachable over one interface, in discovery
/// order — a broadcast send fans out over this order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeighborSet {
    order: Vec<NodeId>,
}

impl NeighborSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.order.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Replace the set contents with `new_order`, preserving its insertion
    /// order. Returns the ids present in `new_order` that were not already
    /// in the set — the newly discovered peers for this scan.
    pub fn replace(&mut self, new_order: Vec<NodeId>) -> Vec<NodeId> {
        let newly_seen: Vec<NodeId> = new_order
            .iter()
            .copied()
            .filter(|id| !self.order.contains(id))
            .collect();
        self.order = new_order;
        newly_seen
    }
}

/// One named interface on a [`crate::Node`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interface {
    pub name: String,
    pub kind: InterfaceKind,
    pub neighbors: NeighborSet,
}

impl Interface {
    /// A proximity interface with no default radio parameters (unbounded
    /// bandwidth, no loss, no delay) beyond its range.
    pub fn proximity(name: impl Into<String>, range_m: f64) -> Self {
        Interface {
            name: name.into(),
            kind: InterfaceKind::Proximity {
                range_m,
                default_bw_bps: 0,
                default_loss: 0.0,
                default_delay_secs: 0.0,
            },
            neighbors: NeighborSet::new(),
        }
    }

    /// A proximity interface with explicit default radio parameters.
    pub fn proximity_with_defaults(
        name: impl Into<String>,
        range_m: f64,
        default_bw_bps: u64,
        default_loss: f64,
        default_delay_secs: f64,
    ) -> Self {
        Interface {
            name: name.into(),
            kind: InterfaceKind::Proximity {
                range_m,
                default_bw_bps,
                default_loss,
                default_delay_secs,
            },
            neighbors: NeighborSet::new(),
        }
    }

    pub fn plan_driven(name: impl Into<String>) -> Self {
        Interface {
            name: name.into(),
            kind: InterfaceKind::Plan,
            neighbors: NeighborSet::new(),
        }
    }
}
