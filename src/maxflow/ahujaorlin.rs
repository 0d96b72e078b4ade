/*
 * Copyright (c) 2022 Frank Fischer <frank-fischer@shadow-soft.de>
 *
 * This program is free software: you can redistribute it and/or
 * modify it under the terms of the GNU General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful, but
 * WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
 * General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see  <http://www.gnu.org/licenses/>
 */

//! The excess scaling algorithm of Ahuja and Orlin.
//!
//! The algorithm maintains a scale `Δ` (a power of two) such that no
//! inner vertex has excess larger than `Δ`. In each scaling phase it
//! repeatedly selects a vertex of *large* excess (more than `Δ/2`) of
//! smallest height and pushes from it, never letting the excess of the
//! receiving vertex exceed `Δ`. Once there is no large vertex left the
//! scale is halved. The algorithm ends after the phase with `Δ = 1`.
//!
//! The result is a complete maximum flow.
//!
//! # Example
//!
//! ```
//! use rs_maxflow::{SparseMatrix, ResidualGraph};
//! use rs_maxflow::maxflow::AhujaOrlin;
//!
//! let m = SparseMatrix::<u32, u32>::from_triplets(4, vec![
//!     (0, 1, 1000), (0, 2, 1000), (1, 2, 1), (1, 3, 1000), (2, 3, 1000),
//! ]);
//! let mut g = ResidualGraph::<u32, u32>::new(&m);
//! let mut ao = AhujaOrlin::new(&mut g);
//! ao.solve(0, 3);
//! assert_eq!(ao.value(), 2000);
//! assert_eq!(ao.cnt_phases, 11);
//! ```

use super::preflow::Preflow;
use crate::residual::ResidualGraph;
use crate::traits::{Capacity, Index};

use std::cmp::min;

use tracing::trace;

/// The excess scaling push-relabel algorithm.
pub struct AhujaOrlin<'a, I, C> {
    g: &'a mut ResidualGraph<I, C>,
    preflow: Preflow<C>,
    /// The large vertices of each height.
    buckets: Vec<Vec<usize>>,
    /// Whether a vertex is contained in a bucket.
    listed: Vec<bool>,
    /// Lower bound on the smallest height of a listed vertex.
    lowest: usize,
    /// The current scale.
    delta: u128,
    value: C,
    /// The number of relabel operations performed during the algorithm.
    pub cnt_relabel: usize,
    /// The number of scaling phases.
    pub cnt_phases: usize,
    /// Whether to use the global relabelling heuristic.
    pub use_global_relabelling: bool,
}

impl<'a, I, C> AhujaOrlin<'a, I, C>
where
    I: Index,
    C: Capacity,
{
    /// Return a new excess scaling instance for a residual graph.
    pub fn new(g: &'a mut ResidualGraph<I, C>) -> Self {
        let n = g.num_vertices();
        AhujaOrlin {
            g,
            preflow: Preflow::new(n),
            buckets: vec![Vec::new(); 2 * n + 1],
            listed: vec![false; n],
            lowest: 0,
            delta: 0,
            value: C::zero(),
            cnt_relabel: 0,
            cnt_phases: 0,
            use_global_relabelling: true,
        }
    }

    /// Return the flow value.
    pub fn value(&self) -> C {
        self.value
    }

    /// Return the underlying residual graph.
    pub fn as_graph(&self) -> &ResidualGraph<I, C> {
        self.g
    }

    /// Run the algorithm from `src` to `snk`.
    pub fn solve(&mut self, src: usize, snk: usize) {
        assert_ne!(src, snk, "Source and sink node must not be equal");
        let n = self.g.num_vertices();

        self.cnt_relabel = 0;
        self.cnt_phases = 0;
        self.preflow.init(self.g, src);
        self.preflow.global_relabel(self.g, src, snk, true);

        let max_excess = self.preflow.excess.iter().map(|e| e.widen()).max().unwrap_or(0);
        self.delta = if max_excess == 0 {
            0
        } else {
            max_excess.next_power_of_two()
        };

        let mut lvl_relabel = if self.use_global_relabelling {
            n
        } else {
            usize::max_value()
        };

        while self.delta > 0 {
            self.cnt_phases += 1;
            self.fill_buckets(src, snk);
            while let Some(u) = self.pop_lowest() {
                self.discharge(u, src, snk);
                if self.cnt_relabel >= lvl_relabel {
                    self.preflow.global_relabel(self.g, src, snk, true);
                    lvl_relabel = self.cnt_relabel + n;
                    self.fill_buckets(src, snk);
                }
            }
            trace!(delta = %self.delta, relabels = self.cnt_relabel, "scaling phase done");
            self.delta /= 2;
        }

        self.value = self.preflow.excess[snk];
    }

    /// Return `true` if `u` has large excess w.r.t. the current scale.
    fn is_large(&self, u: usize) -> bool {
        2 * self.preflow.excess[u].widen() > self.delta
    }

    fn list(&mut self, u: usize) {
        let h = self.preflow.height[u];
        self.buckets[h].push(u);
        self.listed[u] = true;
        self.lowest = self.lowest.min(h);
    }

    /// Put all large vertices into their buckets.
    fn fill_buckets(&mut self, src: usize, snk: usize) {
        for b in &mut self.buckets {
            b.clear();
        }
        self.listed.fill(false);
        self.lowest = self.buckets.len();
        for u in 0..self.g.num_vertices() {
            if u != src && u != snk && self.is_large(u) {
                self.list(u);
            }
        }
    }

    /// Remove a listed vertex of smallest height.
    fn pop_lowest(&mut self) -> Option<usize> {
        while self.lowest < self.buckets.len() {
            if let Some(u) = self.buckets[self.lowest].pop() {
                self.listed[u] = false;
                return Some(u);
            }
            self.lowest += 1;
        }
        None
    }

    /// Push from the large vertex `u` until it is small or has been relabelled.
    fn discharge(&mut self, u: usize, src: usize, snk: usize) {
        let end = self.g.arcs(u).end;
        while self.is_large(u) {
            let a = self.preflow.current[u];
            if a == end {
                self.preflow.relabel(self.g, u);
                self.cnt_relabel += 1;
                self.list(u);
                return;
            }
            if self.preflow.is_admissible(self.g, u, a) {
                let v = self.g.head(a);
                let mut df = min(self.preflow.excess[u], self.g.residual(a));
                if v != src && v != snk {
                    // never exceed the scale at the receiving vertex
                    let room = self.delta - self.preflow.excess[v].widen();
                    df = min(df, C::narrow_saturating(room));
                }
                if !df.is_zero() {
                    self.preflow.push(self.g, u, a, df);
                    if v != src && v != snk && !self.listed[v] && self.is_large(v) {
                        self.list(v);
                    }
                    if !self.g.residual(a).is_zero() {
                        continue;
                    }
                }
            }
            self.preflow.current[u] += 1;
        }
    }
}

/// Solve the maxflow problem using the excess scaling algorithm.
///
/// The function returns the flow value from `src` to `snk`.
pub fn ahujaorlin<I, C>(g: &mut ResidualGraph<I, C>, src: usize, snk: usize) -> C
where
    I: Index,
    C: Capacity,
{
    let mut maxflow = AhujaOrlin::new(g);
    maxflow.solve(src, snk);
    maxflow.value()
}
