//! Node placement for a built graph

mod kamada_kawai;
mod planar;

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::graph::KnowledgeGraph;
use crate::model::Point;
use crate::planarity::is_planar;

/// Which placement algorithm produced a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutAlgorithm {
    /// Straight-line grid drawing without crossings, for planar graphs.
    Planar,
    /// Stress minimisation used for non-planar graphs.
    KamadaKawai,
}

impl LayoutAlgorithm {
    /// Planar for planar graphs, Kamada–Kawai otherwise.
    pub fn for_graph(graph: &KnowledgeGraph) -> Self {
        if is_planar(graph) {
            LayoutAlgorithm::Planar
        } else {
            LayoutAlgorithm::KamadaKawai
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub label: String,
    pub position: Point,
}

/// Positions for every node of one graph, in node insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub algorithm: LayoutAlgorithm,
    pub positions: Vec<NodePosition>,
}

impl Layout {
    pub fn position(&self, label: &str) -> Option<Point> {
        self.positions
            .iter()
            .find(|p| p.label == label)
            .map(|p| p.position)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Index-based view of a graph shared by the placement algorithms.
pub(crate) struct LayoutInput {
    pub n: usize,
    /// Undirected neighbours without self-loops or duplicates.
    pub adjacency: Vec<Vec<usize>>,
}

impl LayoutInput {
    pub(crate) fn from_graph(graph: &KnowledgeGraph) -> Self {
        let indices = graph.node_indices();
        let position: HashMap<_, _> = indices.iter().enumerate().map(|(i, &idx)| (idx, i)).collect();

        let mut adjacency = vec![BTreeSet::new(); indices.len()];
        for (s, t, _) in graph.edge_triples() {
            if s == t {
                continue;
            }
            if let (Some(&a), Some(&b)) = (position.get(&s), position.get(&t)) {
                adjacency[a].insert(b);
                adjacency[b].insert(a);
            }
        }

        LayoutInput {
            n: indices.len(),
            adjacency: adjacency.into_iter().map(|s| s.into_iter().collect()).collect(),
        }
    }
}

/// Lay out a graph with the given algorithm. A planar layout requested for
/// a non-planar graph falls back to Kamada–Kawai.
pub fn layout_with(graph: &KnowledgeGraph, algorithm: LayoutAlgorithm, config: &LayoutConfig) -> Layout {
    let input = LayoutInput::from_graph(graph);
    let planar_points = match algorithm {
        LayoutAlgorithm::Planar => planar::planar(&input),
        LayoutAlgorithm::KamadaKawai => None,
    };
    let (algorithm, mut points) = match planar_points {
        Some(points) => (LayoutAlgorithm::Planar, points),
        None => {
            if algorithm == LayoutAlgorithm::Planar {
                tracing::warn!(nodes = input.n, "No planar drawing, using Kamada-Kawai");
            }
            let points = kamada_kawai::kamada_kawai(&input, &config.kamada_kawai);
            (LayoutAlgorithm::KamadaKawai, points)
        }
    };
    rescale(&mut points, config.scale);

    let positions = graph
        .nodes()
        .into_iter()
        .zip(points)
        .map(|(label, position)| NodePosition {
            label: label.to_string(),
            position,
        })
        .collect();

    Layout {
        algorithm,
        positions,
    }
}

/// Lay out a graph, choosing the algorithm from its planarity.
pub fn layout_graph(graph: &KnowledgeGraph, config: &LayoutConfig) -> Layout {
    layout_with(graph, LayoutAlgorithm::for_graph(graph), config)
}

/// Centre points on the origin and scale so the largest coordinate
/// magnitude equals `scale`.
pub(crate) fn rescale(points: &mut [Point], scale: f64) {
    if points.is_empty() {
        return;
    }
    let count = points.len() as f64;
    let cx = points.iter().map(|p| p.x).sum::<f64>() / count;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / count;
    let mut limit = 0.0f64;
    for p in points.iter_mut() {
        p.x -= cx;
        p.y -= cy;
        limit = limit.max(p.x.abs()).max(p.y.abs());
    }
    if limit > 0.0 {
        for p in points.iter_mut() {
            p.x *= scale / limit;
            p.y *= scale / limit;
        }
    }
}
