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

//! This module implements the max flow algorithm of Edmonds-Karp.
//!
//! Each iteration augments along a shortest path (w.r.t. the number of
//! arcs) from the source to the sink, found by a breadth-first search.
//!
//! # Example
//!
//! ```
//! use rs_maxflow::{DenseMatrix, ResidualGraph};
//! use rs_maxflow::maxflow::EdmondsKarp;
//!
//! let (s, a, b, c, d, t) = (0, 1, 2, 3, 4, 5);
//! let mut caps = vec![0u32; 36];
//! for &(u, v, cap) in &[(s, a, 5), (s, c, 5), (a, b, 2), (a, d, 1), (c, d, 2), (b, t, 4), (d, t, 5)] {
//!     caps[u * 6 + v] = cap;
//! }
//! let m = DenseMatrix::new(6, caps);
//! let mut g = ResidualGraph::<u32, u32>::new(&m);
//!
//! let mut ek = EdmondsKarp::new(&mut g);
//! ek.solve(s, t);
//! assert_eq!(ek.value(), 5);
//! assert_eq!(ek.cnt_augment, 3);
//! assert_eq!(ek.mincut(), vec![s, a, c]);
//! ```

use crate::residual::ResidualGraph;
use crate::traits::{Capacity, Index};

use std::cmp::min;
use std::collections::VecDeque;

const NONE: usize = usize::MAX;

/// Max-flow algorithm of Edmonds and Karp.
pub struct EdmondsKarp<'a, I, C> {
    g: &'a mut ResidualGraph<I, C>,
    /// The arc over which each vertex has been reached in the last search.
    pred: Vec<usize>,
    queue: VecDeque<usize>,
    value: C,
    /// The number of augmenting paths.
    pub cnt_augment: usize,
}

impl<'a, I, C> EdmondsKarp<'a, I, C>
where
    I: Index,
    C: Capacity,
{
    /// Create a new Edmonds-Karp algorithm instance for a residual graph.
    pub fn new(g: &'a mut ResidualGraph<I, C>) -> Self {
        let n = g.num_vertices();
        EdmondsKarp {
            g,
            pred: vec![NONE; n],
            queue: VecDeque::with_capacity(n),
            value: C::zero(),
            cnt_augment: 0,
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
    ///
    /// The flow is added to the current flow of the residual graph.
    pub fn solve(&mut self, src: usize, snk: usize) {
        assert_ne!(src, snk, "Source and sink node must not be equal");

        self.value = C::zero();
        self.cnt_augment = 0;

        while self.search(src, snk) {
            // compute augmentation value
            let mut df = C::max_value();
            let mut v = snk;
            while v != src {
                let a = self.pred[v];
                df = min(df, self.g.residual(a));
                v = self.g.head(self.g.mate(a));
            }

            debug_assert!(!df.is_zero());

            // now augment the flow
            let mut v = snk;
            while v != src {
                let a = self.pred[v];
                self.g.push(a, df);
                v = self.g.head(self.g.mate(a));
            }

            self.value += df;
            self.cnt_augment += 1;
        }
    }

    /// Breadth-first search from `src`.
    ///
    /// Returns `true` if `snk` has been reached.
    fn search(&mut self, src: usize, snk: usize) -> bool {
        self.pred.fill(NONE);
        // just some dummy arc
        self.pred[src] = 0;
        self.queue.clear();
        self.queue.push_back(src);
        while let Some(u) = self.queue.pop_front() {
            for a in self.g.arcs(u) {
                let v = self.g.head(a);
                if self.pred[v] == NONE && !self.g.residual(a).is_zero() {
                    self.pred[v] = a;
                    if v == snk {
                        return true;
                    }
                    self.queue.push_back(v);
                }
            }
        }
        false
    }

    /// Return the minimal cut associated with the last maximum flow.
    ///
    /// These are the vertices reached by the last search from the source.
    pub fn mincut(&self) -> Vec<usize> {
        (0..self.g.num_vertices()).filter(|&u| self.pred[u] != NONE).collect()
    }
}

/// Solve the maxflow problem using the algorithm of Edmonds-Karp.
///
/// The function returns the flow value from `src` to `snk`.
pub fn edmondskarp<I, C>(g: &mut ResidualGraph<I, C>, src: usize, snk: usize) -> C
where
    I: Index,
    C: Capacity,
{
    let mut maxflow = EdmondsKarp::new(g);
    maxflow.solve(src, snk);
    maxflow.value()
}

#[cfg(test)]
mod tests {
    use super::edmondskarp;
    use crate::{DenseMatrix, ResidualGraph};

    #[test]
    fn test_antiparallel() {
        // 0 <-> 1 with capacities in both directions
        let m = DenseMatrix::<u64>::new(3, vec![0, 4, 0, 3, 0, 9, 0, 0, 0]);
        let mut g = ResidualGraph::<u32, u64>::new(&m);
        assert_eq!(edmondskarp(&mut g, 0, 2), 4);
        let mut g = ResidualGraph::<u32, u64>::new(&m);
        assert_eq!(edmondskarp(&mut g, 1, 0), 3);
    }

    #[test]
    fn test_no_path() {
        let m = DenseMatrix::<u32>::new(3, vec![0, 4, 0, 0, 0, 0, 0, 7, 0]);
        let mut g = ResidualGraph::<u64, u32>::new(&m);
        assert_eq!(edmondskarp(&mut g, 0, 2), 0);
        assert_eq!(g.min_cut(2), vec![0, 1]);
    }
}
