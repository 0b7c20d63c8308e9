//! Core data structures for the relation graph

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Color assigned to every rewritten edge.
pub const DEFAULT_EDGE_COLOR: &str = "lightgrey";

/// A subject–predicate–object statement parsed from one raw line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Triple {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// A triple after entity resolution: both sides are in their final form and
/// the predicate carries the fragments stripped from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedEdge {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    /// Display color. Uniform for now.
    pub color: String,
}

/// Original label -> canonical label.
///
/// Built once per segment and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MergeMap(BTreeMap<String, String>);

impl MergeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, original: String, canonical: String) {
        self.0.insert(original, canonical);
    }

    /// Canonical replacement for a label, if it was merged.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.0.get(label).map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every label chosen as some other label's representative.
    pub fn canonical_nodes(&self) -> BTreeSet<String> {
        self.0.values().cloned().collect()
    }
}

/// Output of the entity resolver for one segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub merge_map: MergeMap,
    /// Labels that are the merge target of at least one other label.
    ///
    /// A label with no containment relation to any other label is not in
    /// this set, even though its edges still reach the graph.
    pub canonical_nodes: BTreeSet<String>,
    pub edges: Vec<UpdatedEdge>,
}

/// One independently processed part of a relations stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Zero-based position in the stream.
    pub index: usize,
    /// Number of segments in the stream.
    pub total: usize,
    pub lines: Vec<String>,
}

impl Segment {
    /// Presentation heading, only present for multi-part streams.
    pub fn title(&self) -> Option<String> {
        (self.total > 1).then(|| format!("Part {}/{}", self.index + 1, self.total))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }
}

/// A 2D position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}
