//! Graph construction from a drained triple sequence.

use std::collections::HashMap;

use crate::source::TripleRecord;

use super::{edge_key, Graph, Node, NodeId};

/// Owns the in-progress node and edge maps during ingest and returns an
/// immutable [`Graph`] on completion.
///
/// Triples whose start or end name is empty after trimming are skipped and
/// counted, never fatal. Inserting N triples yields at most 2N nodes.
#[derive(Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    index: HashMap<(String, String), NodeId>,
    adjacency: Vec<Vec<NodeId>>,
    edge_labels: HashMap<(NodeId, NodeId), String>,
    dropped: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one triple: resolve or create both endpoint nodes and set
    /// the relation label on their edge. A repeated endpoint pair keeps a
    /// single edge whose label is overwritten by the newest triple.
    pub fn insert(&mut self, triple: &TripleRecord) {
        let start_name = triple.start_name.trim();
        let end_name = triple.end_name.trim();
        if start_name.is_empty() || end_name.is_empty() {
            self.dropped += 1;
            log::debug!(
                "Dropping triple with empty identity field: {:?} -[{}]-> {:?}",
                triple.start_name,
                triple.relation,
                triple.end_name
            );
            return;
        }

        let start = self.intern(
            triple.start_label.trim(),
            start_name,
            triple.start_origin.as_deref(),
        );
        let end = self.intern(
            triple.end_label.trim(),
            end_name,
            triple.end_origin.as_deref(),
        );
        self.connect(start, end, &triple.relation);
    }

    /// Resolve a (label, name) identity to its node, creating it on first
    /// sight. Node order is insertion order.
    fn intern(&mut self, label: &str, name: &str, origin: Option<&str>) -> NodeId {
        let key = (label.to_string(), name.to_string());
        if let Some(&id) = self.index.get(&key) {
            // Keep the first origin seen; later triples may omit it.
            if self.nodes[id].origin_id.is_none() {
                self.nodes[id].origin_id = origin.map(str::to_string);
            }
            return id;
        }

        let id = self.nodes.len();
        self.nodes.push(Node {
            label: label.to_string(),
            name: name.to_string(),
            origin_id: origin.map(str::to_string),
        });
        self.adjacency.push(Vec::new());
        self.index.insert(key, id);
        id
    }

    fn connect(&mut self, a: NodeId, b: NodeId, relation: &str) {
        let key = edge_key(a, b);
        if !self.edge_labels.contains_key(&key) {
            self.adjacency[a].push(b);
            if a != b {
                self.adjacency[b].push(a);
            }
        }
        self.edge_labels.insert(key, relation.to_string());
    }

    /// Number of triples skipped so far.
    pub fn dropped_count(&self) -> usize {
        self.dropped
    }

    /// Finish construction and return the immutable graph.
    pub fn finish(self) -> Graph {
        log::info!(
            "Built graph: {} nodes, {} edges, {} triples dropped",
            self.nodes.len(),
            self.edge_labels.len(),
            self.dropped
        );
        Graph {
            nodes: self.nodes,
            index: self.index,
            adjacency: self.adjacency,
            edge_labels: self.edge_labels,
            dropped: self.dropped,
        }
    }
}

/// Build a graph from a full triple sequence.
pub fn build_graph<'a, I>(triples: I) -> Graph
where
    I: IntoIterator<Item = &'a TripleRecord>,
{
    let mut builder = GraphBuilder::new();
    for triple in triples {
        builder.insert(triple);
    }
    builder.finish()
}
