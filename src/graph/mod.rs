//! In-memory award network: graph construction from triples and
//! shortest-path queries between named entities.
//!
//! The graph is built once per run from a drained triple sequence and is
//! read-only afterwards; all query functions take `&Graph`.

mod builder;
mod path;

pub use builder::{build_graph, GraphBuilder};
pub use path::{find_person, format_path, shortest_path, PathStep};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index of a node within the `Graph` that produced it.
pub type NodeId = usize;

/// A graph node: entity label plus human-readable display name.
///
/// Identity is exactly the (label, name) pair; `origin_id` is the store
/// identifier the node came from and is used for diagnostics only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub label: String,
    pub name: String,
    pub origin_id: Option<String>,
}

impl Node {
    /// `<label>:<name>`, the form paths are reported in.
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.label, self.name)
    }
}

/// Undirected, node-deduplicated graph over (label, name) identities.
///
/// Nodes are enumerated in insertion order. Each unordered endpoint pair
/// holds a single relation label slot; when duplicate triples connect the
/// same pair with different relations, the last one written wins.
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) index: HashMap<(String, String), NodeId>,
    pub(crate) adjacency: Vec<Vec<NodeId>>,
    pub(crate) edge_labels: HashMap<(NodeId, NodeId), String>,
    pub(crate) dropped: usize,
}

impl Graph {
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_labels.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id < self.nodes.len()
    }

    /// Resolve a (label, name) identity to its node, if present.
    pub fn lookup(&self, label: &str, name: &str) -> Option<NodeId> {
        self.index
            .get(&(label.to_string(), name.to_string()))
            .copied()
    }

    /// Neighbors in the order their edges were first inserted.
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Relation label on the edge between two nodes, if they are adjacent.
    pub fn relation_between(&self, a: NodeId, b: NodeId) -> Option<&str> {
        self.edge_labels.get(&edge_key(a, b)).map(String::as_str)
    }

    /// Triples skipped during construction because an identity field was
    /// empty after trimming.
    pub fn dropped_count(&self) -> usize {
        self.dropped
    }
}

/// Normalize an unordered endpoint pair to a map key.
pub(crate) fn edge_key(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
