//! `NodeTable` — the simulator's arena of `Node`s, indexed by `NodeId`.
//!
//! A `Node` never holds a reference to another `Node` or to the simulator —
//! every cross-reference is a `NodeId`, resolved here.

use pons_core::NodeId;

use crate::node::Node;

/// Owns every `Node` in a run, indexed densely by `NodeId::index()`.
#[derive(Clone, Debug, Default)]
pub struct NodeTable {
    nodes: Vec<Node>,
}

impl NodeTable {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Insert `node`, growing the table to fit its id. Ids are expected to
    /// be assigned densely from `0`; a sparse id still works but wastes
    /// slots (filled with placeholder nodes at `NodeId::INVALID`'s
    /// position would be a bug — callers should assign ids densely).
    pub fn insert(&mut self, node: Node) {
        let idx = node.id.index();
        if idx >= self.nodes.len() {
            self.nodes.resize_with(idx + 1, || Node::new(NodeId::INVALID, "", Default::default()));
        }
        self.nodes[idx] = node;
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).filter(|n| n.id == id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).filter(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.id != NodeId::INVALID).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every real node in the table (skips unfilled placeholder slots left
    /// by a sparse `insert`).
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.id != NodeId::INVALID)
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes().map(|n| n.id)
    }
}
