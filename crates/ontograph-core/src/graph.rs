//! Graph wrapper using petgraph::StableDiGraph keyed by canonical label

use std::collections::{BTreeSet, HashMap};

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::model::{Resolution, UpdatedEdge};

/// A node of the relation graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeNode {
    pub label: String,
}

/// A directed, labeled arc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEdge {
    pub label: String,
    pub color: String,
}

/// Serializable view of one arc with its endpoint labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub label: String,
    pub color: String,
}

/// The relation graph: at most one arc per ordered node pair.
pub struct KnowledgeGraph {
    inner: StableDiGraph<KnowledgeNode, KnowledgeEdge>,
    index: HashMap<String, NodeIndex>,
}

impl std::fmt::Debug for KnowledgeGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeGraph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        KnowledgeGraph {
            inner: StableDiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Add a node unless one with this label exists. Returns its index.
    pub fn add_node(&mut self, label: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(label) {
            return idx;
        }
        let idx = self.inner.add_node(KnowledgeNode {
            label: label.to_string(),
        });
        self.index.insert(label.to_string(), idx);
        idx
    }

    /// Add an arc, overwriting label and color of an existing arc between
    /// the same ordered pair. Missing endpoints are created.
    pub fn upsert_edge(&mut self, source: &str, target: &str, label: &str, color: &str) {
        let a = self.add_node(source);
        let b = self.add_node(target);
        self.inner.update_edge(
            a,
            b,
            KnowledgeEdge {
                label: label.to_string(),
                color: color.to_string(),
            },
        );
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Total number of arcs.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    pub fn contains_node(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    pub fn node_index(&self, label: &str) -> Option<NodeIndex> {
        self.index.get(label).copied()
    }

    pub fn label(&self, idx: NodeIndex) -> Option<&str> {
        self.inner.node_weight(idx).map(|n| n.label.as_str())
    }

    /// Node indices in insertion order.
    pub fn node_indices(&self) -> Vec<NodeIndex> {
        self.inner.node_indices().collect()
    }

    /// Node labels in insertion order.
    pub fn nodes(&self) -> Vec<&str> {
        self.inner
            .node_indices()
            .filter_map(|idx| self.label(idx))
            .collect()
    }

    /// Arcs as (source, target, weight) in insertion order.
    pub fn edge_triples(&self) -> Vec<(NodeIndex, NodeIndex, &KnowledgeEdge)> {
        self.inner
            .edge_indices()
            .filter_map(|id| {
                let (s, t) = self.inner.edge_endpoints(id)?;
                Some((s, t, self.inner.edge_weight(id)?))
            })
            .collect()
    }

    /// Arcs with endpoint labels, in insertion order.
    pub fn edges(&self) -> Vec<EdgeRecord> {
        self.edge_triples()
            .into_iter()
            .filter_map(|(s, t, w)| {
                Some(EdgeRecord {
                    source: self.label(s)?.to_string(),
                    target: self.label(t)?.to_string(),
                    label: w.label.clone(),
                    color: w.color.clone(),
                })
            })
            .collect()
    }

    /// The arc from `source` to `target`, if any.
    pub fn edge_between(&self, source: &str, target: &str) -> Option<&KnowledgeEdge> {
        let a = self.node_index(source)?;
        let b = self.node_index(target)?;
        let id = self.inner.find_edge(a, b)?;
        self.inner.edge_weight(id)
    }

    /// Neighbours ignoring direction, without self-loops or duplicates.
    pub fn neighbors_undirected(&self, idx: NodeIndex) -> BTreeSet<NodeIndex> {
        self.inner
            .neighbors_directed(idx, Direction::Outgoing)
            .chain(self.inner.neighbors_directed(idx, Direction::Incoming))
            .filter(|&n| n != idx)
            .collect()
    }

    /// Number of distinct undirected node pairs joined by an arc.
    pub fn undirected_edge_count(&self) -> usize {
        let pairs: BTreeSet<(usize, usize)> = self
            .edge_triples()
            .into_iter()
            .filter(|(s, t, _)| s != t)
            .map(|(s, t, _)| {
                let (a, b) = (s.index(), t.index());
                (a.min(b), a.max(b))
            })
            .collect();
        pairs.len()
    }

    /// Subgraph induced by `members`, preserving insertion order of both
    /// nodes and arcs.
    pub fn induced_subgraph(&self, members: &[NodeIndex]) -> KnowledgeGraph {
        let keep: BTreeSet<NodeIndex> = members.iter().copied().collect();
        let mut sub = KnowledgeGraph::new();
        for idx in self.inner.node_indices().filter(|idx| keep.contains(idx)) {
            if let Some(label) = self.label(idx) {
                sub.add_node(label);
            }
        }
        for (s, t, w) in self.edge_triples() {
            if !keep.contains(&s) || !keep.contains(&t) {
                continue;
            }
            if let (Some(source), Some(target)) = (self.label(s), self.label(t)) {
                sub.upsert_edge(source, target, &w.label, &w.color);
            }
        }
        sub
    }
}

impl Default for KnowledgeGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the directed graph for one resolved segment.
///
/// Canonical nodes are added first, even without arcs; then every edge is
/// inserted, later edges overwriting earlier ones for the same ordered pair.
pub fn build_graph(resolution: &Resolution) -> KnowledgeGraph {
    build_from_parts(&resolution.canonical_nodes, &resolution.edges)
}

pub fn build_from_parts(canonical_nodes: &BTreeSet<String>, edges: &[UpdatedEdge]) -> KnowledgeGraph {
    let mut graph = KnowledgeGraph::new();
    for node in canonical_nodes {
        graph.add_node(node);
    }
    for edge in edges {
        graph.upsert_edge(&edge.subject, &edge.object, &edge.predicate, &edge.color);
    }
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Built relation graph"
    );
    graph
}
