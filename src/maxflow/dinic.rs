// Copyright (c) 2016-2022 Frank Fischer <frank-fischer@shadow-soft.de>
//
// This program is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see  <http://www.gnu.org/licenses/>
//

//! This module implements Dinic' max flow algorithm
//!
//! # Example
//!
//! ```
//! use rs_maxflow::{Network, SparseMatrix, ResidualGraph};
//! use rs_maxflow::maxflow::Dinic;
//!
//! let (s, a, b, c, d, e, f, g, h, t) = (0, 1, 2, 3, 4, 5, 6, 7, 8, 9);
//! let m = SparseMatrix::<u32, u64>::from_triplets(10, vec![
//!     (s, b, 18), (s, e, 27), (b, a, 8), (b, c, 9), (b, f, 6),
//!     (a, c, 1), (a, d, 10), (d, c, 3), (c, d, 8), (e, c, 5),
//!     (e, f, 9), (e, h, 5), (e, d, 2), (f, g, 6), (h, g, 4),
//!     (h, d, 8), (d, t, 33), (g, t, 6),
//! ]);
//! assert_eq!(m.num_arcs(), 18);
//! let mut res = ResidualGraph::<u32, u64>::new(&m);
//!
//! let mut dinic = Dinic::new(&mut res);
//! dinic.solve(s, t);
//! assert_eq!(dinic.value(), 29);
//! assert_eq!(dinic.mincut(), vec![s, b, c, e, f]);
//! ```

use crate::residual::ResidualGraph;
use crate::traits::{Capacity, Index};

use std::collections::VecDeque;

use tracing::trace;

/// The dinic max-flow algorithm.
pub struct Dinic<'a, I, C> {
    g: &'a mut ResidualGraph<I, C>,
    /// Distance of each vertex from the source in the level graph.
    dist: Vec<usize>,
    /// The current arc of each vertex.
    current: Vec<usize>,
    queue: VecDeque<usize>,
    /// The arcs of the current search path.
    path: Vec<usize>,
    value: C,
    /// The number of blocking flow phases.
    pub cnt_phases: usize,
}

impl<'a, I, C> Dinic<'a, I, C>
where
    I: Index,
    C: Capacity,
{
    /// Create a new Dinic algorithm instance for a residual graph.
    pub fn new(g: &'a mut ResidualGraph<I, C>) -> Self {
        let n = g.num_vertices();
        Dinic {
            g,
            dist: vec![n; n],
            current: vec![0; n],
            queue: VecDeque::with_capacity(n),
            path: Vec::with_capacity(n),
            value: C::zero(),
            cnt_phases: 0,
        }
    }

    /// Return the underlying residual graph.
    pub fn as_graph(&self) -> &ResidualGraph<I, C> {
        self.g
    }

    /// Return the value of the latest computed maximum flow.
    pub fn value(&self) -> C {
        self.value
    }

    /// Solve the maxflow problem from the source `src` to the sink `snk`.
    pub fn solve(&mut self, src: usize, snk: usize) {
        assert_ne!(src, snk, "Source and sink node must not be equal");

        self.value = C::zero();
        self.cnt_phases = 0;
        while self.search(src, snk) {
            self.cnt_phases += 1;
            self.augment(src, snk);
        }
        trace!(phases = self.cnt_phases, value = %self.value, "dinic");
    }

    /// Return the minimal cut associated with the last maximum flow.
    pub fn mincut(&self) -> Vec<usize> {
        let n = self.g.num_vertices();
        (0..n).filter(|&u| self.dist[u] < n).collect()
    }

    /// Build the level graph.
    ///
    /// Returns `true` if the sink is reachable from the source.
    fn search(&mut self, src: usize, snk: usize) -> bool {
        let n = self.g.num_vertices();

        self.dist.fill(n);
        self.dist[src] = 0;
        self.queue.clear();
        self.queue.push_back(src);

        let mut snk_d = n;
        while let Some(u) = self.queue.pop_front() {
            let d = self.dist[u];
            self.current[u] = self.g.arcs(u).start;
            if d >= snk_d {
                continue;
            }
            for a in self.g.arcs(u) {
                let v = self.g.head(a);
                if self.dist[v] == n && !self.g.residual(a).is_zero() {
                    self.dist[v] = d + 1;
                    if v == snk {
                        snk_d = d + 1;
                    } else {
                        self.queue.push_back(v);
                    }
                }
            }
        }

        snk_d < n
    }

    /// Send a blocking flow through the level graph.
    fn augment(&mut self, src: usize, snk: usize) {
        self.path.clear();
        let snk_d = self.dist[snk];
        let mut u = src;
        loop {
            if u == snk {
                let df = self
                    .path
                    .iter()
                    .map(|&a| self.g.residual(a))
                    .min()
                    .unwrap_or_else(C::zero);
                for &a in &self.path {
                    self.g.push(a, df);
                }
                self.value += df;

                // retreat to the tail of the first saturated arc
                let k = self
                    .path
                    .iter()
                    .position(|&a| self.g.residual(a).is_zero())
                    .unwrap_or(0);
                self.path.truncate(k);
                u = self.path.last().map(|&a| self.g.head(a)).unwrap_or(src);
                continue;
            }

            // advance along the current arc
            let end = self.g.arcs(u).end;
            let mut advanced = false;
            while self.current[u] < end {
                let a = self.current[u];
                let v = self.g.head(a);
                if !self.g.residual(a).is_zero()
                    && self.dist[v] == self.dist[u] + 1
                    && (v == snk || self.dist[v] < snk_d)
                {
                    self.path.push(a);
                    u = v;
                    advanced = true;
                    break;
                }
                self.current[u] += 1;
            }

            if !advanced {
                // dead end, `u` is blocked for the rest of the phase
                match self.path.pop() {
                    Some(a) => {
                        u = self.g.head(self.g.mate(a));
                        self.current[u] += 1;
                    }
                    None => break,
                }
            }
        }
    }
}

/// Solve the maxflow problem using the algorithm of Dinic.
///
/// The function returns the flow value from `src` to `snk`.
pub fn dinic<I, C>(g: &mut ResidualGraph<I, C>, src: usize, snk: usize) -> C
where
    I: Index,
    C: Capacity,
{
    let mut maxflow = Dinic::new(g);
    maxflow.solve(src, snk);
    maxflow.value()
}
