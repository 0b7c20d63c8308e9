//! Straight-line planar drawing
//!
//! The embedding from the planarity test is made connected and
//! biconnected, every face but the largest is triangulated, and nodes are
//! placed on an integer grid with the shift method of Chrobak and Payne
//! following a canonical ordering. Each node is inserted above the contour
//! of the nodes placed before it, and the contour is stretched so that
//! the new node sees all of its lower neighbours, which keeps every edge
//! free of crossings and of other nodes.

use std::collections::{BTreeSet, HashSet};

use crate::embedding::Embedding;
use crate::model::Point;
use crate::planarity::planar_embedding;

use super::LayoutInput;

/// Positions for graphs too small to triangulate.
const SMALL: [(f64, f64); 3] = [(0.0, 0.0), (2.0, 0.0), (1.0, 1.0)];

/// Grid positions without crossings, or `None` if the graph is not planar.
pub(crate) fn planar(input: &LayoutInput) -> Option<Vec<Point>> {
    let mut embedding = planar_embedding(&input.adjacency)?;
    if input.n < 4 {
        return Some(
            SMALL
                .iter()
                .take(input.n)
                .map(|&(x, y)| Point::new(x, y))
                .collect(),
        );
    }

    let outer = triangulate(&mut embedding);
    let order = canonical_ordering(&embedding, &outer)?;
    Some(shift_placement(input.n, &order))
}

/// Join components, remove cut vertices and triangulate all inner faces.
/// Returns the largest face, which stays the outer face.
fn triangulate(embedding: &mut Embedding) -> Vec<usize> {
    let n = embedding.node_count();

    let mut seen = vec![false; n];
    let mut representatives = Vec::new();
    for start in 0..n {
        if seen[start] {
            continue;
        }
        seen[start] = true;
        representatives.push(start);
        let mut stack = vec![start];
        while let Some(v) = stack.pop() {
            for w in embedding.neighbors_cw(v) {
                if !seen[w] {
                    seen[w] = true;
                    stack.push(w);
                }
            }
        }
    }
    for pair in representatives.windows(2) {
        embedding.connect_components(pair[0], pair[1]);
    }

    let mut faces: Vec<Vec<usize>> = Vec::new();
    let mut outer: Option<usize> = None;
    let mut counted: HashSet<(usize, usize)> = HashSet::new();
    for v in 0..n {
        let Some(start) = embedding.first_neighbor(v) else {
            continue;
        };
        // The rotation of v can grow while its faces are walked.
        let mut current = start;
        loop {
            if let Some(face) = make_biconnected(embedding, v, current, &mut counted) {
                if outer.is_none_or(|i| face.len() > faces[i].len()) {
                    outer = Some(faces.len());
                }
                faces.push(face);
            }
            match embedding.cw(v, current) {
                Some(next) if next != start => current = next,
                _ => break,
            }
        }
    }

    for (i, face) in faces.iter().enumerate() {
        if Some(i) == outer {
            continue;
        }
        if let [a, b, ..] = face[..] {
            triangulate_face(embedding, a, b);
        }
    }

    outer.map(|i| faces.swap_remove(i)).unwrap_or_default()
}

/// Walk the face left of `(start, out)`. A node met twice is a cut vertex
/// of the face; a chord around it is added. Returns the face's nodes, or
/// `None` if the face was walked before.
fn make_biconnected(
    embedding: &mut Embedding,
    start: usize,
    out: usize,
    counted: &mut HashSet<(usize, usize)>,
) -> Option<Vec<usize>> {
    if !counted.insert((start, out)) {
        return None;
    }

    let mut face = vec![start];
    let mut on_face: HashSet<usize> = HashSet::from([start]);
    let (mut v1, mut v2) = (start, out);
    let (_, mut v3) = embedding.next_face_half_edge(v1, v2);

    while v2 != start || v3 != out {
        if on_face.contains(&v2) {
            embedding.add_chord(v1, v2, v3);
            counted.insert((v2, v3));
            counted.insert((v3, v1));
            v2 = v1;
        } else {
            on_face.insert(v2);
            face.push(v2);
        }
        v1 = v2;
        (v2, v3) = embedding.next_face_half_edge(v2, v3);
        counted.insert((v1, v2));
    }
    Some(face)
}

/// Fan out the face left of `(v1, v2)` into triangles.
fn triangulate_face(embedding: &mut Embedding, mut v1: usize, mut v2: usize) {
    let (_, mut v3) = embedding.next_face_half_edge(v1, v2);
    let (_, mut v4) = embedding.next_face_half_edge(v2, v3);
    if v1 == v2 || v1 == v3 {
        return;
    }
    while v1 != v4 {
        if embedding.has_edge(v1, v3) {
            (v1, v2, v3) = (v2, v3, v4);
        } else {
            embedding.add_chord(v1, v2, v3);
            (v2, v3) = (v3, v4);
        }
        (_, v4) = embedding.next_face_half_edge(v2, v3);
    }
}

/// Outer face of the graph induced by the nodes not yet removed.
struct Contour {
    base: usize,
    ccw: Vec<Option<usize>>,
    cw: Vec<Option<usize>>,
    removed: Vec<bool>,
}

impl Contour {
    fn contains(&self, v: usize) -> bool {
        !self.removed[v] && (self.ccw[v].is_some() || v == self.base)
    }

    fn adjacent(&self, v: usize, w: usize) -> bool {
        self.ccw[v] == Some(w) || self.cw[v] == Some(w)
    }
}

/// One step of a canonical ordering: the node and the contour nodes it
/// attaches to, from left to right.
type Step = (usize, Vec<usize>);

/// Canonical ordering of a triangulated embedding, built by peeling
/// chord-free nodes off the outer face.
fn canonical_ordering(embedding: &Embedding, outer: &[usize]) -> Option<Vec<Step>> {
    let n = embedding.node_count();
    let [v1, v2, ..] = outer[..] else {
        return None;
    };

    let mut contour = Contour {
        base: v1,
        ccw: vec![None; n],
        cw: vec![None; n],
        removed: vec![false; n],
    };
    let mut previous = v2;
    for &v in &outer[2..] {
        contour.ccw[previous] = Some(v);
        previous = v;
    }
    contour.ccw[previous] = Some(v1);
    let mut previous = v1;
    for &v in outer[1..].iter().rev() {
        contour.cw[previous] = Some(v);
        previous = v;
    }

    let mut chords = vec![0usize; n];
    let mut ready: BTreeSet<usize> = outer.iter().copied().collect();
    for &v in outer {
        for w in embedding.neighbors_cw(v) {
            if contour.contains(w) && !contour.adjacent(v, w) {
                chords[v] += 1;
                ready.remove(&v);
            }
        }
    }
    ready.remove(&v1);
    ready.remove(&v2);

    let mut order: Vec<Option<Step>> = vec![None; n];
    order[0] = Some((v1, Vec::new()));
    order[1] = Some((v2, Vec::new()));

    for k in (2..n).rev() {
        let v = ready.pop_last()?;
        contour.removed[v] = true;

        let (mut wp, mut wq) = (None, None);
        for w in embedding.neighbors_cw(v) {
            if contour.removed[w] {
                continue;
            }
            if contour.contains(w) {
                if w == v1 {
                    wp = Some(v1);
                } else if w == v2 {
                    wq = Some(v2);
                } else if contour.cw[w] == Some(v) {
                    wp = Some(w);
                } else {
                    wq = Some(w);
                }
            }
            if wp.is_some() && wq.is_some() {
                break;
            }
        }
        let (Some(wp), Some(wq)) = (wp, wq) else {
            return None;
        };

        let mut attached = vec![wp];
        let mut w = wp;
        while w != wq {
            let next = embedding.ccw(v, w)?;
            attached.push(next);
            contour.cw[w] = Some(next);
            contour.ccw[next] = Some(w);
            w = next;
        }

        if attached.len() == 2 {
            // The removed node closed a triangle over the chord wp-wq.
            for w in [wp, wq] {
                chords[w] = chords[w].saturating_sub(1);
                if chords[w] == 0 && w != v1 && w != v2 {
                    ready.insert(w);
                }
            }
        } else {
            let inner = &attached[1..attached.len() - 1];
            let fresh: HashSet<usize> = inner.iter().copied().collect();
            for &w in inner {
                ready.insert(w);
                for x in embedding.neighbors_cw(w) {
                    if contour.contains(x) && !contour.adjacent(w, x) {
                        chords[w] += 1;
                        ready.remove(&w);
                        if !fresh.contains(&x) {
                            chords[x] += 1;
                            ready.remove(&x);
                        }
                    }
                }
            }
        }
        order[k] = Some((v, attached));
    }

    order.into_iter().collect()
}

/// Chrobak–Payne placement. Offsets are kept relative to a tree over the
/// contour so a shift moves whole subtrees at once; absolute x positions
/// are resolved at the end.
fn shift_placement(n: usize, order: &[Step]) -> Vec<Point> {
    let mut left: Vec<Option<usize>> = vec![None; n];
    let mut right: Vec<Option<usize>> = vec![None; n];
    let mut dx = vec![0i64; n];
    let mut y = vec![0i64; n];

    let [(a, _), (b, _), (c, _), ..] = order else {
        return vec![Point::default(); n];
    };
    let (a, b, c) = (*a, *b, *c);
    dx[b] = 1;
    dx[c] = 1;
    y[c] = 1;
    right[a] = Some(c);
    right[c] = Some(b);

    for (vk, contour) in &order[3..] {
        let vk = *vk;
        let len = contour.len();
        if len < 2 {
            continue;
        }
        let (wp, wp1) = (contour[0], contour[1]);
        let (wq1, wq) = (contour[len - 2], contour[len - 1]);
        let several = len > 2;

        // Stretch the gaps next to wp and wq.
        dx[wp1] += 1;
        dx[wq] += 1;

        let span: i64 = contour[1..].iter().map(|&w| dx[w]).sum();
        dx[vk] = (span - y[wp] + y[wq]).div_euclid(2);
        y[vk] = (span + y[wp] + y[wq]).div_euclid(2);
        dx[wq] = span - dx[vk];
        if several {
            dx[wp1] -= dx[vk];
        }

        right[wp] = Some(vk);
        right[vk] = Some(wq);
        if several {
            left[vk] = Some(wp1);
            right[wq1] = None;
        } else {
            left[vk] = None;
        }
    }

    let mut x: Vec<Option<i64>> = vec![None; n];
    x[a] = Some(0);
    let mut stack = vec![a];
    while let Some(parent) = stack.pop() {
        let px = x[parent].unwrap_or(0);
        for child in [left[parent], right[parent]].into_iter().flatten() {
            x[child] = Some(px + dx[child]);
            stack.push(child);
        }
    }

    (0..n)
        .map(|v| Point::new(x[v].unwrap_or(0) as f64, y[v] as f64))
        .collect()
}
