//! Drawable geometry for a laid-out graph
//!
//! A [`Scene`] is everything a plotting front end needs: node markers with
//! their text, one straight segment per arc with an arrowhead annotation,
//! and the arc label anchored at the segment midpoint.

use serde::{Deserialize, Serialize};

use crate::graph::KnowledgeGraph;
use crate::layout::{Layout, LayoutAlgorithm};
use crate::model::Point;

pub const NODE_COLOR: &str = "DarkSeaGreen";
pub const NODE_FONT_SIZE: u32 = 13;
pub const EDGE_LABEL_COLOR: &str = "DarkBlue";
pub const EDGE_LABEL_FONT_SIZE: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMarker {
    pub label: String,
    pub position: Point,
    pub color: String,
    pub font_size: u32,
}

/// Arrowhead annotation drawn at the target end of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub head: u8,
    pub size: f64,
    pub width: f64,
}

impl Default for Arrow {
    fn default() -> Self {
        Arrow {
            head: 2,
            size: 2.0,
            width: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSegment {
    pub source: String,
    pub target: String,
    pub from: Point,
    pub to: Point,
    pub color: String,
    pub arrow: Arrow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeLabel {
    pub text: String,
    pub position: Point,
    pub color: String,
    pub font_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub algorithm: LayoutAlgorithm,
    pub nodes: Vec<NodeMarker>,
    pub edges: Vec<EdgeSegment>,
    pub labels: Vec<EdgeLabel>,
}

impl Scene {
    /// A graph with no nodes draws nothing.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Combine a graph with its layout into drawable geometry.
///
/// Arcs whose endpoints are missing from the layout are skipped.
pub fn scene(graph: &KnowledgeGraph, layout: &Layout) -> Scene {
    let nodes = layout
        .positions
        .iter()
        .map(|p| NodeMarker {
            label: p.label.clone(),
            position: p.position,
            color: NODE_COLOR.to_string(),
            font_size: NODE_FONT_SIZE,
        })
        .collect();

    let mut edges = Vec::new();
    let mut labels = Vec::new();
    for record in graph.edges() {
        let (Some(from), Some(to)) = (layout.position(&record.source), layout.position(&record.target)) else {
            continue;
        };
        labels.push(EdgeLabel {
            text: record.label,
            position: Point::midpoint(from, to),
            color: EDGE_LABEL_COLOR.to_string(),
            font_size: EDGE_LABEL_FONT_SIZE,
        });
        edges.push(EdgeSegment {
            source: record.source,
            target: record.target,
            from,
            to,
            color: record.color,
            arrow: Arrow::default(),
        });
    }

    Scene {
        algorithm: layout.algorithm,
        nodes,
        edges,
        labels,
    }
}
