//! `Static` router: a precomputed next-hop table.
//!
//! The table is built by breadth-first search over a supplied contact
//! graph, since PONS's network topology is already expressed as a
//! `pons_topology::NetworkPlan` graph: one first-hop per destination, with
//! an optional wildcard fallback for anything unreachable or unlisted.

use std::collections::{HashMap, HashSet, VecDeque};

use pons_core::NodeId;

/// Maps a destination to the next hop that reaches it, computed once via
/// breadth-first shortest path from `root` over an undirected edge list. BFS
/// visits neighbours in adjacency order, so ties between equal-length paths
/// resolve deterministically to whichever neighbour was listed first.
#[derive(Clone, Debug, Default)]
pub struct StaticTable {
    next_hop: HashMap<NodeId, NodeId>,
    wildcard: Option<NodeId>,
}

impl StaticTable {
    pub fn build(edges: &[(NodeId, NodeId)], root: NodeId) -> Self {
        let mut adjacency: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for &(a, b) in edges {
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }

        let mut first_hop: HashMap<NodeId, NodeId> = HashMap::new();
        let mut visited: HashSet<NodeId> = HashSet::from([root]);
        let mut queue: VecDeque<NodeId> = VecDeque::new();

        if let Some(neighbors) = adjacency.get(&root) {
            for &n in neighbors {
                if visited.insert(n) {
                    first_hop.insert(n, n);
                    queue.push_back(n);
                }
            }
        }
        while let Some(node) = queue.pop_front() {
            let hop = first_hop[&node];
            if let Some(neighbors) = adjacency.get(&node) {
                for &n in neighbors {
                    if visited.insert(n) {
                        first_hop.insert(n, hop);
                        queue.push_back(n);
                    }
                }
            }
        }

        StaticTable { next_hop: first_hop, wildcard: None }
    }

    /// Fall back to `next_hop` for any destination with no computed route.
    pub fn with_wildcard(mut self, next_hop: NodeId) -> Self {
        self.wildcard = Some(next_hop);
        self
    }

    pub fn next_hop(&self, dst: NodeId) -> Option<NodeId> {
        self.next_hop.get(&dst).copied().or(self.wildcard)
    }
}
