//! Proximity graph over particle positions
//!
//! A greedy pass over index pairs `i < j` in ascending order: a pair closer
//! than the threshold becomes an edge when neither endpoint has reached the
//! degree cap. The result is a pure function of the positions, so
//! rebuilding twice without moving yields the same edges.

use tracing::trace;

use super::config::ConnectionConfig;
use super::particle::Particle;

/// Undirected edge, always stored with `a < b`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
}

impl Edge {
    pub fn new(i: usize, j: usize) -> Self {
        Self { a: i.min(j), b: i.max(j) }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProximityGraph {
    threshold: f32,
    degree_cap: usize,
    edges: Vec<Edge>,
    degree: Vec<usize>,
}

impl ProximityGraph {
    pub fn new(config: &ConnectionConfig) -> Self {
        Self {
            threshold: config.threshold,
            degree_cap: config.degree_cap,
            edges: Vec::new(),
            degree: Vec::new(),
        }
    }

    /// Recompute every edge from the current positions.
    pub fn rebuild(&mut self, particles: &[Particle]) {
        let n = particles.len();
        self.edges.clear();
        self.degree.clear();
        self.degree.resize(n, 0);

        let limit = self.threshold * self.threshold;
        for i in 0..n {
            for j in (i + 1)..n {
                if self.degree[i] >= self.degree_cap {
                    break;
                }
                if self.degree[j] >= self.degree_cap {
                    continue;
                }
                if particles[i].position.distance_squared(particles[j].position) < limit {
                    self.edges.push(Edge { a: i, b: j });
                    self.degree[i] += 1;
                    self.degree[j] += 1;
                }
            }
        }

        trace!(nodes = n, edges = self.edges.len(), "Proximity graph rebuilt");
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edge count touching `i` (0 for unknown indices).
    #[inline]
    pub fn degree(&self, i: usize) -> usize {
        self.degree.get(i).copied().unwrap_or(0)
    }

    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges.iter().filter_map(move |e| {
            if e.a == i {
                Some(e.b)
            } else if e.b == i {
                Some(e.a)
            } else {
                None
            }
        })
    }
}
