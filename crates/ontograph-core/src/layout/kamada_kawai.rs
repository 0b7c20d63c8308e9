//! Kamada–Kawai stress minimisation
//!
//! Every node pair is tied by a spring whose rest length is their graph
//! distance. The node with the largest energy gradient is moved by
//! Newton–Raphson steps until every gradient falls below epsilon.

use std::collections::VecDeque;
use std::f64::consts::PI;

use super::LayoutInput;
use crate::config::KamadaKawaiConfig;
use crate::model::Point;

/// Shortest-path hop counts; unreachable pairs are `None`.
fn all_pairs_distances(adjacency: &[Vec<usize>]) -> Vec<Vec<Option<usize>>> {
    let n = adjacency.len();
    (0..n)
        .map(|source| {
            let mut dist = vec![None; n];
            dist[source] = Some(0);
            let mut queue = VecDeque::from([source]);
            while let Some(u) = queue.pop_front() {
                let du = dist[u].unwrap_or(0);
                for &v in &adjacency[u] {
                    if dist[v].is_none() {
                        dist[v] = Some(du + 1);
                        queue.push_back(v);
                    }
                }
            }
            dist
        })
        .collect()
}

struct Springs {
    length: Vec<Vec<f64>>,
    strength: Vec<Vec<f64>>,
}

impl Springs {
    fn new(adjacency: &[Vec<usize>]) -> Self {
        let distances = all_pairs_distances(adjacency);
        let longest = distances
            .iter()
            .flatten()
            .filter_map(|d| *d)
            .max()
            .unwrap_or(0);
        // Separate components sit one hop beyond the graph's diameter.
        let unreachable = (longest + 1) as f64;

        let n = adjacency.len();
        let mut length = vec![vec![0.0; n]; n];
        let mut strength = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let d = distances[i][j].map_or(unreachable, |d| d as f64);
                length[i][j] = d;
                strength[i][j] = 1.0 / (d * d);
            }
        }
        Springs { length, strength }
    }

    /// Gradient and Hessian of the energy with respect to node `m`.
    fn derivatives(&self, points: &[Point], m: usize) -> (f64, f64, f64, f64, f64) {
        let (mut gx, mut gy) = (0.0, 0.0);
        let (mut hxx, mut hxy, mut hyy) = (0.0, 0.0, 0.0);
        let pm = points[m];
        for (i, pi) in points.iter().enumerate() {
            if i == m {
                continue;
            }
            let dx = pm.x - pi.x;
            let dy = pm.y - pi.y;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < 1e-9 {
                continue;
            }
            let k = self.strength[m][i];
            let l = self.length[m][i];
            let cube = dist * dist * dist;
            gx += k * (dx - l * dx / dist);
            gy += k * (dy - l * dy / dist);
            hxx += k * (1.0 - l * dy * dy / cube);
            hxy += k * (l * dx * dy / cube);
            hyy += k * (1.0 - l * dx * dx / cube);
        }
        (gx, gy, hxx, hxy, hyy)
    }

    fn gradient_norm(&self, points: &[Point], m: usize) -> f64 {
        let (gx, gy, ..) = self.derivatives(points, m);
        (gx * gx + gy * gy).sqrt()
    }
}

/// Place nodes of `input`; positions are not yet rescaled.
pub(crate) fn kamada_kawai(input: &LayoutInput, config: &KamadaKawaiConfig) -> Vec<Point> {
    let n = input.n;
    if n <= 1 {
        return vec![Point::default(); n];
    }

    let springs = Springs::new(&input.adjacency);
    let max_step = springs.length.iter().flatten().copied().fold(1.0, f64::max);

    let mut points: Vec<Point> = (0..n)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / n as f64;
            Point::new(angle.cos(), angle.sin())
        })
        .collect();

    for _ in 0..config.max_iterations {
        let mut worst = 0;
        let mut worst_norm = 0.0;
        for m in 0..n {
            let norm = springs.gradient_norm(&points, m);
            if norm > worst_norm {
                worst = m;
                worst_norm = norm;
            }
        }
        if worst_norm < config.epsilon {
            break;
        }

        for _ in 0..config.inner_iterations {
            let (gx, gy, hxx, hxy, hyy) = springs.derivatives(&points, worst);
            if (gx * gx + gy * gy).sqrt() < config.epsilon {
                break;
            }
            let det = hxx * hyy - hxy * hxy;
            if det.abs() < 1e-12 {
                break;
            }
            let mut step_x = (-gx * hyy + gy * hxy) / det;
            let mut step_y = (-gy * hxx + gx * hxy) / det;
            let step = (step_x * step_x + step_y * step_y).sqrt();
            if step > max_step {
                step_x *= max_step / step;
                step_y *= max_step / step;
            }
            points[worst].x += step_x;
            points[worst].y += step_y;
        }
    }

    tracing::trace!(nodes = n, "Kamada-Kawai layout finished");
    points
}
