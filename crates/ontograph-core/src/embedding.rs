//! Combinatorial planar embeddings
//!
//! An embedding stores, for every node, the circular order of its
//! neighbours (a rotation system). Each half-edge `(v, w)` knows the next
//! neighbour of `v` clockwise and counterclockwise from `w`. Faces are
//! walked by always turning to the counterclockwise neighbour at the far
//! end of the current half-edge.

use std::collections::HashMap;

/// Where a new half-edge goes in the rotation of its start node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Directly counterclockwise of the given neighbour.
    BeforeCw(usize),
    /// Directly clockwise of the given neighbour.
    AfterCcw(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Turn {
    cw: usize,
    ccw: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Embedding {
    rotation: Vec<HashMap<usize, Turn>>,
    first: Vec<Option<usize>>,
}

impl Embedding {
    pub fn new(n: usize) -> Self {
        Embedding {
            rotation: vec![HashMap::new(); n],
            first: vec![None; n],
        }
    }

    pub fn node_count(&self) -> usize {
        self.rotation.len()
    }

    pub fn has_edge(&self, v: usize, w: usize) -> bool {
        self.rotation[v].contains_key(&w)
    }

    pub fn degree(&self, v: usize) -> usize {
        self.rotation[v].len()
    }

    /// The neighbour the clockwise walk around `v` starts from.
    pub fn first_neighbor(&self, v: usize) -> Option<usize> {
        self.first[v]
    }

    pub fn cw(&self, v: usize, w: usize) -> Option<usize> {
        self.rotation[v].get(&w).map(|t| t.cw)
    }

    pub fn ccw(&self, v: usize, w: usize) -> Option<usize> {
        self.rotation[v].get(&w).map(|t| t.ccw)
    }

    /// Insert the half-edge `(v, w)`. The placement is ignored for the
    /// first half-edge out of `v`, and so is a reference that is not a
    /// neighbour of `v`.
    pub fn add_half_edge(&mut self, v: usize, w: usize, placement: Option<Placement>) {
        let rotation = &mut self.rotation[v];
        let reference = match placement {
            Some(Placement::BeforeCw(r) | Placement::AfterCcw(r)) if rotation.contains_key(&r) => {
                placement
            }
            _ => None,
        };

        match reference {
            None if rotation.is_empty() => {
                rotation.insert(w, Turn { cw: w, ccw: w });
                self.first[v] = Some(w);
            }
            Some(Placement::BeforeCw(r)) => {
                let before = rotation[&r].ccw;
                rotation.insert(w, Turn { cw: r, ccw: before });
                if let Some(t) = rotation.get_mut(&before) {
                    t.cw = w;
                }
                if let Some(t) = rotation.get_mut(&r) {
                    t.ccw = w;
                }
                if self.first[v] == Some(r) {
                    self.first[v] = Some(w);
                }
            }
            Some(Placement::AfterCcw(r)) => {
                let after = rotation[&r].cw;
                rotation.insert(w, Turn { cw: after, ccw: r });
                if let Some(t) = rotation.get_mut(&after) {
                    t.ccw = w;
                }
                if let Some(t) = rotation.get_mut(&r) {
                    t.cw = w;
                }
            }
            None => {
                let first = self.first[v];
                self.add_half_edge(v, w, first.map(Placement::BeforeCw));
            }
        }
    }

    /// Insert `(v, w)` so that `w` becomes the first neighbour of `v`.
    pub fn add_half_edge_first(&mut self, v: usize, w: usize) {
        let first = self.first[v];
        self.add_half_edge(v, w, first.map(Placement::BeforeCw));
    }

    /// Join two nodes from different connected components.
    pub fn connect_components(&mut self, v: usize, w: usize) {
        self.add_half_edge_first(v, w);
        self.add_half_edge_first(w, v);
    }

    /// Add the edge `{v, w}` inside the face that contains the half-edge
    /// `(v, via)`, where `via` is followed by `w` along that face.
    pub fn add_chord(&mut self, v: usize, via: usize, w: usize) {
        self.add_half_edge(v, w, Some(Placement::AfterCcw(via)));
        self.add_half_edge(w, v, Some(Placement::BeforeCw(via)));
    }

    /// The half-edge following `(v, w)` on the face to its left.
    pub fn next_face_half_edge(&self, v: usize, w: usize) -> (usize, usize) {
        (w, self.ccw(w, v).unwrap_or(v))
    }

    /// Neighbours of `v` in clockwise order, starting at its first one.
    pub fn neighbors_cw(&self, v: usize) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.degree(v));
        let Some(start) = self.first[v] else {
            return order;
        };
        let mut current = start;
        loop {
            order.push(current);
            match self.cw(v, current) {
                Some(next) if next != start => current = next,
                _ => break,
            }
        }
        order
    }
}
