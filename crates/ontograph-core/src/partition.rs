//! Planarity split and per-component layouts

use std::collections::HashMap;

use petgraph::stable_graph::NodeIndex;
use petgraph::unionfind::UnionFind;

use crate::config::{ComponentPolicy, LayoutConfig};
use crate::graph::KnowledgeGraph;
use crate::layout::{layout_graph, layout_with, Layout, LayoutAlgorithm};
use crate::planarity::is_planar;

/// One connected component of a non-planar graph with its own layout.
#[derive(Debug)]
pub struct ComponentView {
    /// Member labels in insertion order.
    pub nodes: Vec<String>,
    pub graph: KnowledgeGraph,
    pub layout: Layout,
}

#[derive(Debug)]
pub enum Partition {
    /// The whole graph is drawn once.
    Planar { layout: Layout },
    /// A force-directed layout of the whole graph plus one layout per
    /// undirected connected component.
    NonPlanar {
        full: Layout,
        components: Vec<ComponentView>,
    },
}

impl Partition {
    pub fn is_planar(&self) -> bool {
        matches!(self, Partition::Planar { .. })
    }

    /// Layout of the whole graph.
    pub fn full_layout(&self) -> &Layout {
        match self {
            Partition::Planar { layout } => layout,
            Partition::NonPlanar { full, .. } => full,
        }
    }

    pub fn components(&self) -> &[ComponentView] {
        match self {
            Partition::Planar { .. } => &[],
            Partition::NonPlanar { components, .. } => components,
        }
    }
}

/// Undirected connected components, each in node insertion order, ordered
/// by their first member.
pub fn connected_components(graph: &KnowledgeGraph) -> Vec<Vec<NodeIndex>> {
    let indices = graph.node_indices();
    let slot: HashMap<NodeIndex, usize> = indices.iter().enumerate().map(|(i, &idx)| (idx, i)).collect();

    let mut sets = UnionFind::<usize>::new(indices.len());
    for (s, t, _) in graph.edge_triples() {
        if let (Some(&a), Some(&b)) = (slot.get(&s), slot.get(&t)) {
            sets.union(a, b);
        }
    }

    let mut order: Vec<usize> = Vec::new();
    let mut groups: HashMap<usize, Vec<NodeIndex>> = HashMap::new();
    for (i, &idx) in indices.iter().enumerate() {
        let root = sets.find(i);
        groups
            .entry(root)
            .or_insert_with(|| {
                order.push(root);
                Vec::new()
            })
            .push(idx);
    }
    order
        .into_iter()
        .filter_map(|root| groups.remove(&root))
        .collect()
}

/// Decide planarity and compute the layouts the renderer needs.
pub fn partition(graph: &KnowledgeGraph, config: &LayoutConfig) -> Partition {
    if is_planar(graph) {
        tracing::debug!(
            nodes = graph.node_count(),
            links = graph.undirected_edge_count(),
            "Graph is planar"
        );
        return Partition::Planar {
            layout: layout_with(graph, LayoutAlgorithm::Planar, config),
        };
    }

    let full = layout_with(graph, LayoutAlgorithm::KamadaKawai, config);
    let components: Vec<ComponentView> = connected_components(graph)
        .into_iter()
        .map(|members| {
            let sub = graph.induced_subgraph(&members);
            let layout = match config.component_policy {
                ComponentPolicy::Redetect => layout_graph(&sub, config),
                ComponentPolicy::Inherit => layout_with(&sub, LayoutAlgorithm::KamadaKawai, config),
            };
            ComponentView {
                nodes: sub.nodes().into_iter().map(str::to_string).collect(),
                graph: sub,
                layout,
            }
        })
        .collect();

    tracing::debug!(
        nodes = graph.node_count(),
        components = components.len(),
        "Graph is not planar, split into components"
    );
    Partition::NonPlanar { full, components }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_of(arcs: &[(&str, &str)]) -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();
        for (s, t) in arcs {
            graph.upsert_edge(s, t, "rel", "lightgrey");
        }
        graph
    }

    fn complete(prefix: &str, n: usize) -> Vec<(String, String)> {
        let mut arcs = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                arcs.push((format!("{prefix}{i}"), format!("{prefix}{j}")));
            }
        }
        arcs
    }

    #[test]
    fn test_components_follow_insertion_order() {
        let mut graph = graph_of(&[("a", "b"), ("c", "d"), ("b", "e")]);
        graph.add_node("lonely");
        let labels: Vec<Vec<&str>> = connected_components(&graph)
            .into_iter()
            .map(|c| c.into_iter().filter_map(|idx| graph.label(idx)).collect())
            .collect();
        assert_eq!(labels, vec![vec!["a", "b", "e"], vec!["c", "d"], vec!["lonely"]]);
    }

    #[test]
    fn test_direction_is_ignored_for_components() {
        let graph = graph_of(&[("a", "b"), ("c", "b")]);
        assert_eq!(connected_components(&graph).len(), 1);
    }

    #[test]
    fn test_triangle_gets_single_layout() {
        let graph = graph_of(&[("a", "b"), ("b", "c"), ("c", "a")]);
        let partition = partition(&graph, &LayoutConfig::default());
        assert!(partition.is_planar());
        assert_eq!(partition.full_layout().algorithm, LayoutAlgorithm::Planar);
        assert_eq!(partition.full_layout().len(), 3);
        assert!(partition.components().is_empty());
    }

    #[test]
    fn test_k5_with_satellite_splits_components() {
        let mut arcs = complete("k", 5);
        arcs.push(("x".into(), "y".into()));
        let mut graph = KnowledgeGraph::new();
        for (s, t) in &arcs {
            graph.upsert_edge(s, t, "rel", "lightgrey");
        }

        let result = partition(&graph, &LayoutConfig::default());
        assert!(!result.is_planar());
        assert_eq!(result.full_layout().algorithm, LayoutAlgorithm::KamadaKawai);
        assert_eq!(result.full_layout().len(), 7);

        let components = result.components();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].nodes.len(), 5);
        assert_eq!(components[0].layout.algorithm, LayoutAlgorithm::KamadaKawai);
        assert_eq!(components[1].nodes, vec!["x", "y"]);
        assert_eq!(components[1].layout.algorithm, LayoutAlgorithm::Planar);
    }

    #[test]
    fn test_inherit_policy_keeps_force_layout() {
        let mut arcs = complete("k", 5);
        arcs.push(("x".into(), "y".into()));
        let mut graph = KnowledgeGraph::new();
        for (s, t) in &arcs {
            graph.upsert_edge(s, t, "rel", "lightgrey");
        }
        let config = LayoutConfig {
            component_policy: ComponentPolicy::Inherit,
            ..LayoutConfig::default()
        };
        let result = partition(&graph, &config);
        assert!(result
            .components()
            .iter()
            .all(|c| c.layout.algorithm == LayoutAlgorithm::KamadaKawai));
    }

    #[test]
    fn test_long_chain_is_planar() {
        let mut graph = KnowledgeGraph::new();
        for i in 1..50_000 {
            graph.upsert_edge(&format!("n{}", i - 1), &format!("n{i}"), "next", "lightgrey");
        }
        let result = partition(&graph, &LayoutConfig::default());
        assert!(result.is_planar());
        assert_eq!(result.full_layout().len(), 50_000);
        assert!(result
            .full_layout()
            .positions
            .iter()
            .all(|p| p.position.x.abs() <= 1.0 && p.position.y.abs() <= 1.0));
    }
}
