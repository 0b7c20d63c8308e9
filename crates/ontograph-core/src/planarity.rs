//! Left-right planarity test
//!
//! Decides planarity of the undirected simple projection of a graph (arc
//! direction, parallel arcs and self-loops are ignored). The test follows
//! the left-right criterion of de Fraysseix and Rosenstiehl in the
//! formulation of Brandes ("The Left-Right Planarity Test"): an orientation
//! DFS computes lowpoints and nesting depths, then a testing DFS keeps a
//! stack of conflict pairs of return-edge intervals.

use std::collections::{HashMap, HashSet};

use crate::embedding::{Embedding, Placement};
use crate::graph::KnowledgeGraph;

/// `true` when the graph can be drawn in the plane without crossings.
pub fn is_planar(graph: &KnowledgeGraph) -> bool {
    is_planar_adjacency(&undirected_adjacency(graph))
}

/// Symmetric adjacency lists over node insertion positions.
fn undirected_adjacency(graph: &KnowledgeGraph) -> Vec<Vec<usize>> {
    let indices = graph.node_indices();
    let position: HashMap<_, _> = indices.iter().enumerate().map(|(i, &idx)| (idx, i)).collect();
    indices
        .iter()
        .map(|&idx| {
            graph
                .neighbors_undirected(idx)
                .into_iter()
                .filter_map(|n| position.get(&n).copied())
                .collect()
        })
        .collect()
}

/// Planarity of a simple undirected graph given as symmetric adjacency
/// lists over `0..n`.
pub fn is_planar_adjacency(adjacency: &[Vec<usize>]) -> bool {
    passes_edge_bound(adjacency) && LrState::new(adjacency).run()
}

/// A rotation system without crossings, or `None` for a non-planar graph.
pub fn planar_embedding(adjacency: &[Vec<usize>]) -> Option<Embedding> {
    if !passes_edge_bound(adjacency) {
        return None;
    }
    let mut state = LrState::new(adjacency);
    state.test_all().then(|| state.embed())
}

fn passes_edge_bound(adjacency: &[Vec<usize>]) -> bool {
    let n = adjacency.len();
    let m = adjacency.iter().map(Vec::len).sum::<usize>() / 2;
    n <= 2 || m <= 3 * n - 6
}

type Edge = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Interval {
    low: Option<Edge>,
    high: Option<Edge>,
}

impl Interval {
    fn is_empty(&self) -> bool {
        self.low.is_none() && self.high.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct ConflictPair {
    left: Interval,
    right: Interval,
}

impl ConflictPair {
    fn swap(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
    }
}

struct LrState<'a> {
    adjacency: &'a [Vec<usize>],
    roots: Vec<usize>,
    height: Vec<Option<usize>>,
    parent_edge: Vec<Option<Edge>>,
    oriented: HashSet<Edge>,
    out_edges: Vec<Vec<usize>>,
    lowpt: HashMap<Edge, usize>,
    lowpt2: HashMap<Edge, usize>,
    nesting_depth: HashMap<Edge, usize>,
    reference: HashMap<Edge, Option<Edge>>,
    /// Edges placed on the left of their reference; all others go right.
    flipped: HashSet<Edge>,
    lowpt_edge: HashMap<Edge, Edge>,
    stack_bottom: HashMap<Edge, Option<ConflictPair>>,
    stack: Vec<ConflictPair>,
}

impl<'a> LrState<'a> {
    fn new(adjacency: &'a [Vec<usize>]) -> Self {
        let n = adjacency.len();
        LrState {
            adjacency,
            roots: Vec::new(),
            height: vec![None; n],
            parent_edge: vec![None; n],
            oriented: HashSet::new(),
            out_edges: vec![Vec::new(); n],
            lowpt: HashMap::new(),
            lowpt2: HashMap::new(),
            nesting_depth: HashMap::new(),
            reference: HashMap::new(),
            flipped: HashSet::new(),
            lowpt_edge: HashMap::new(),
            stack_bottom: HashMap::new(),
            stack: Vec::new(),
        }
    }

    fn run(mut self) -> bool {
        self.test_all()
    }

    /// Orientation and testing phases over every DFS tree.
    fn test_all(&mut self) -> bool {
        let n = self.adjacency.len();
        let mut next = vec![0usize; n];
        for v in 0..n {
            if self.height[v].is_none() {
                self.height[v] = Some(0);
                self.roots.push(v);
                self.orient(v, &mut next);
            }
        }

        for v in 0..n {
            let mut outgoing = std::mem::take(&mut self.out_edges[v]);
            outgoing.sort_by_key(|&w| self.nesting_depth.get(&(v, w)).copied().unwrap_or(0));
            self.out_edges[v] = outgoing;
        }

        let mut next = vec![0usize; n];
        let roots = self.roots.clone();
        roots.into_iter().all(|root| self.test(root, &mut next))
    }

    fn height_of(&self, v: usize) -> usize {
        self.height[v].unwrap_or(0)
    }

    fn low(&self, e: Edge) -> usize {
        self.lowpt.get(&e).copied().unwrap_or(0)
    }

    /// Orientation DFS: fixes arc directions, heights and lowpoints.
    /// `next[v]` is the position in `v`'s adjacency list to resume from.
    fn orient(&mut self, root: usize, next: &mut [usize]) {
        let mut stack = vec![root];
        let mut descended: HashSet<Edge> = HashSet::new();

        while let Some(v) = stack.pop() {
            let parent = self.parent_edge[v];
            let hv = self.height_of(v);

            while next[v] < self.adjacency[v].len() {
                let w = self.adjacency[v][next[v]];
                let vw = (v, w);

                if !descended.contains(&vw) {
                    if self.oriented.contains(&vw) || self.oriented.contains(&(w, v)) {
                        next[v] += 1;
                        continue;
                    }
                    self.oriented.insert(vw);
                    self.out_edges[v].push(w);
                    self.lowpt.insert(vw, hv);
                    self.lowpt2.insert(vw, hv);

                    match self.height[w] {
                        None => {
                            self.parent_edge[w] = Some(vw);
                            self.height[w] = Some(hv + 1);
                            descended.insert(vw);
                            stack.push(v);
                            stack.push(w);
                            break;
                        }
                        Some(hw) => {
                            self.lowpt.insert(vw, hw);
                        }
                    }
                }

                let low = self.low(vw);
                let low2 = self.lowpt2.get(&vw).copied().unwrap_or(hv);
                let mut depth = 2 * low;
                if low2 < hv {
                    depth += 1;
                }
                self.nesting_depth.insert(vw, depth);

                if let Some(e) = parent {
                    let (low_e, low2_e) = (self.low(e), self.lowpt2.get(&e).copied().unwrap_or(0));
                    if low < low_e {
                        self.lowpt2.insert(e, low_e.min(low2));
                        self.lowpt.insert(e, low);
                    } else if low > low_e {
                        self.lowpt2.insert(e, low2_e.min(low));
                    } else {
                        self.lowpt2.insert(e, low2_e.min(low2));
                    }
                }
                next[v] += 1;
            }
        }
    }

    /// Testing DFS. Returns `false` as soon as a conflict cannot be resolved.
    fn test(&mut self, root: usize, next: &mut [usize]) -> bool {
        let mut stack = vec![root];
        let mut descended: HashSet<Edge> = HashSet::new();

        while let Some(v) = stack.pop() {
            let parent = self.parent_edge[v];
            let hv = self.height_of(v);
            let mut finished = true;

            while next[v] < self.out_edges[v].len() {
                let position = next[v];
                let w = self.out_edges[v][position];
                let ei = (v, w);

                if !descended.contains(&ei) {
                    self.stack_bottom.insert(ei, self.stack.last().copied());
                    if self.parent_edge[w] == Some(ei) {
                        descended.insert(ei);
                        stack.push(v);
                        stack.push(w);
                        finished = false;
                        break;
                    }
                    self.lowpt_edge.insert(ei, ei);
                    self.stack.push(ConflictPair {
                        left: Interval::default(),
                        right: Interval {
                            low: Some(ei),
                            high: Some(ei),
                        },
                    });
                }

                if self.low(ei) < hv {
                    match parent {
                        Some(e) if position == 0 => {
                            if let Some(&le) = self.lowpt_edge.get(&ei) {
                                self.lowpt_edge.insert(e, le);
                            }
                        }
                        Some(e) => {
                            if !self.add_constraints(ei, e) {
                                return false;
                            }
                        }
                        None => {}
                    }
                }
                next[v] += 1;
            }

            if let (true, Some(e)) = (finished, parent) {
                self.remove_back_edges(e);
            }
        }
        true
    }
    fn conflicting(&self, interval: &Interval, b: Edge) -> bool {
        match interval.high {
            Some(high) => !interval.is_empty() && self.low(high) > self.low(b),
            None => false,
        }
    }

    fn lowest(&self, pair: &ConflictPair) -> usize {
        let left = pair.left.low.map(|e| self.low(e));
        let right = pair.right.low.map(|e| self.low(e));
        match (left, right) {
            (Some(l), Some(r)) => l.min(r),
            (Some(l), None) => l,
            (None, Some(r)) => r,
            (None, None) => usize::MAX,
        }
    }

    fn set_ref(&mut self, edge: Option<Edge>, target: Option<Edge>) {
        if let Some(edge) = edge {
            self.reference.insert(edge, target);
        }
    }

    fn add_constraints(&mut self, ei: Edge, e: Edge) -> bool {
        let mut merged = ConflictPair::default();
        let bottom = self.stack_bottom.get(&ei).copied().flatten();

        // Merge return edges of ei into the right interval.
        loop {
            let Some(mut q) = self.stack.pop() else {
                break;
            };
            if !q.left.is_empty() {
                q.swap();
            }
            if !q.left.is_empty() {
                return false;
            }
            let q_low = q.right.low.map(|l| self.low(l)).unwrap_or(0);
            if q_low > self.low(e) {
                if merged.right.is_empty() {
                    merged.right = q.right;
                } else {
                    self.set_ref(merged.right.low, q.right.high);
                }
                merged.right.low = q.right.low;
            } else {
                let target = self.lowpt_edge.get(&e).copied();
                self.set_ref(q.right.low, target);
            }
            if self.stack.last().copied() == bottom {
                break;
            }
        }

        // Merge conflicting return edges of earlier siblings into the left interval.
        while let Some(top) = self.stack.last().copied() {
            if !(self.conflicting(&top.left, ei) || self.conflicting(&top.right, ei)) {
                break;
            }
            let Some(mut q) = self.stack.pop() else {
                break;
            };
            if self.conflicting(&q.right, ei) {
                q.swap();
            }
            if self.conflicting(&q.right, ei) {
                return false;
            }
            self.set_ref(merged.right.low, q.right.high);
            if q.right.low.is_some() {
                merged.right.low = q.right.low;
            }
            if merged.left.is_empty() {
                merged.left = q.left;
            } else {
                self.set_ref(merged.left.low, q.left.high);
            }
            merged.left.low = q.left.low;
        }

        if !merged.left.is_empty() || !merged.right.is_empty() {
            self.stack.push(merged);
        }
        true
    }

    fn follow_ref(&self, edge: Edge) -> Option<Edge> {
        self.reference.get(&edge).copied().flatten()
    }

    fn remove_back_edges(&mut self, e: Edge) {
        let u = e.0;
        let hu = self.height_of(u);

        // Drop conflict pairs whose return edges all end at the parent.
        while let Some(top) = self.stack.last().copied() {
            if self.lowest(&top) != hu {
                break;
            }
            self.stack.pop();
            if let Some(low) = top.left.low {
                self.flipped.insert(low);
            }
        }

        if let Some(mut pair) = self.stack.pop() {
            while let Some(high) = pair.left.high {
                if high.1 != u {
                    break;
                }
                pair.left.high = self.follow_ref(high);
            }
            if let (None, Some(low)) = (pair.left.high, pair.left.low) {
                self.set_ref(Some(low), pair.right.low);
                self.flipped.insert(low);
                pair.left.low = None;
            }

            while let Some(high) = pair.right.high {
                if high.1 != u {
                    break;
                }
                pair.right.high = self.follow_ref(high);
            }
            if let (None, Some(low)) = (pair.right.high, pair.right.low) {
                self.set_ref(Some(low), pair.left.low);
                self.flipped.insert(low);
                pair.right.low = None;
            }
            self.stack.push(pair);
        }

        // The side of e follows its highest return edge.
        if self.low(e) < hu {
            if let Some(top) = self.stack.last().copied() {
                let (hl, hr) = (top.left.high, top.right.high);
                let highest = match (hl, hr) {
                    (Some(l), Some(r)) if self.low(l) > self.low(r) => Some(l),
                    (Some(l), None) => Some(l),
                    _ => hr,
                };
                self.set_ref(Some(e), highest);
            }
        }
    }

    /// Resolve the side of `e` relative to its reference chain into an
    /// absolute side. Returns `true` for the left side.
    fn resolve_side(&mut self, e: Edge) -> bool {
        let mut stack = vec![e];
        let mut resolved_from: HashMap<Edge, Edge> = HashMap::new();

        while let Some(top) = stack.pop() {
            match self.follow_ref(top) {
                Some(target) => {
                    stack.push(top);
                    stack.push(target);
                    resolved_from.insert(top, target);
                    self.reference.insert(top, None);
                }
                None => {
                    let toggles = resolved_from
                        .get(&top)
                        .is_some_and(|target| self.flipped.contains(target));
                    if toggles && !self.flipped.remove(&top) {
                        self.flipped.insert(top);
                    }
                }
            }
        }
        self.flipped.contains(&e)
    }

    /// Build the rotation system from the sides fixed by a successful test.
    fn embed(mut self) -> Embedding {
        let n = self.adjacency.len();
        let mut signed: HashMap<Edge, i64> = HashMap::new();
        for v in 0..n {
            for i in 0..self.out_edges[v].len() {
                let e = (v, self.out_edges[v][i]);
                let depth = self.nesting_depth.get(&e).copied().unwrap_or(0) as i64;
                let sign = if self.resolve_side(e) { -1 } else { 1 };
                signed.insert(e, sign * depth);
            }
        }

        let mut embedding = Embedding::new(n);
        for v in 0..n {
            self.out_edges[v].sort_by_key(|&w| signed.get(&(v, w)).copied().unwrap_or(0));
            let mut previous = None;
            for &w in &self.out_edges[v] {
                embedding.add_half_edge(v, w, previous.map(Placement::AfterCcw));
                previous = Some(w);
            }
        }

        let mut left_ref: Vec<Option<usize>> = vec![None; n];
        let mut right_ref: Vec<Option<usize>> = vec![None; n];
        let mut next = vec![0usize; n];
        for &root in &self.roots {
            let mut stack = vec![root];
            while let Some(v) = stack.pop() {
                while next[v] < self.out_edges[v].len() {
                    let w = self.out_edges[v][next[v]];
                    next[v] += 1;
                    let ei = (v, w);

                    if self.parent_edge[w] == Some(ei) {
                        embedding.add_half_edge_first(w, v);
                        left_ref[v] = Some(w);
                        right_ref[v] = Some(w);
                        stack.push(v);
                        stack.push(w);
                        break;
                    }
                    if self.flipped.contains(&ei) {
                        embedding.add_half_edge(w, v, left_ref[w].map(Placement::BeforeCw));
                        left_ref[w] = Some(v);
                    } else {
                        embedding.add_half_edge(w, v, right_ref[w].map(Placement::AfterCcw));
                    }
                }
            }
        }
        embedding
    }
}
