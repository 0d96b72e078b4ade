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

//! Push-relabel with first-in-first-out selection of active vertices.
//!
//! The algorithm computes a complete maximum flow: excess that cannot
//! reach the sink is returned to the source.

use super::preflow::Preflow;
use crate::residual::ResidualGraph;
use crate::traits::{Capacity, Index};

use std::cmp::min;
use std::collections::VecDeque;

use tracing::trace;

/// The FIFO push-relabel algorithm.
pub struct Fifo<'a, I, C> {
    g: &'a mut ResidualGraph<I, C>,
    preflow: Preflow<C>,
    /// The active vertices.
    queue: VecDeque<usize>,
    value: C,
    /// The number of relabel operations performed during the algorithm.
    pub cnt_relabel: usize,
    /// Whether to use the global relabelling heuristic.
    pub use_global_relabelling: bool,
}

impl<'a, I, C> Fifo<'a, I, C>
where
    I: Index,
    C: Capacity,
{
    /// Return a new FIFO push-relabel instance for a residual graph.
    pub fn new(g: &'a mut ResidualGraph<I, C>) -> Self {
        let n = g.num_vertices();
        Fifo {
            g,
            preflow: Preflow::new(n),
            queue: VecDeque::with_capacity(n),
            value: C::zero(),
            cnt_relabel: 0,
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
        self.preflow.init(self.g, src);
        self.preflow.global_relabel(self.g, src, snk, true);

        self.queue.clear();
        self.queue
            .extend((0..n).filter(|&u| self.preflow.is_active(u, src, snk)));

        let mut lvl_relabel = if self.use_global_relabelling {
            n
        } else {
            usize::max_value()
        };
        let mut cnt_global = 0;

        while let Some(u) = self.queue.pop_front() {
            self.discharge(u, src, snk);
            if self.cnt_relabel >= lvl_relabel {
                self.preflow.global_relabel(self.g, src, snk, true);
                lvl_relabel = self.cnt_relabel + n;
                cnt_global += 1;
            }
        }

        self.value = self.preflow.excess[snk];
        trace!(relabels = self.cnt_relabel, global = cnt_global, "fifo push-relabel");
    }

    /// Push from `u` until its excess is zero or it has been relabelled.
    ///
    /// A relabelled vertex is put at the end of the queue.
    fn discharge(&mut self, u: usize, src: usize, snk: usize) {
        let end = self.g.arcs(u).end;
        while !self.preflow.excess[u].is_zero() {
            let a = self.preflow.current[u];
            if a == end {
                self.preflow.relabel(self.g, u);
                self.cnt_relabel += 1;
                self.queue.push_back(u);
                return;
            }
            if self.preflow.is_admissible(self.g, u, a) {
                let v = self.g.head(a);
                let df = min(self.preflow.excess[u], self.g.residual(a));
                if self.preflow.push(self.g, u, a, df) && v != src && v != snk {
                    self.queue.push_back(v);
                }
                if !self.g.residual(a).is_zero() {
                    // u has been discharged completely
                    continue;
                }
            }
            self.preflow.current[u] += 1;
        }
    }
}

/// Solve the maxflow problem using the FIFO push-relabel algorithm.
///
/// The function returns the flow value from `src` to `snk`.
pub fn fifo<I, C>(g: &mut ResidualGraph<I, C>, src: usize, snk: usize) -> C
where
    I: Index,
    C: Capacity,
{
    let mut maxflow = Fifo::new(g);
    maxflow.solve(src, snk);
    maxflow.value()
}

#[cfg(test)]
mod tests {
    use super::Fifo;
    use crate::{DenseMatrix, ResidualGraph};

    fn network() -> DenseMatrix<u32> {
        let mut caps = vec![0u32; 36];
        for &(u, v, c) in &[
            (0, 2, 15),
            (0, 4, 10),
            (2, 3, 6),
            (2, 4, 7),
            (3, 1, 5),
            (3, 5, 2),
            (4, 3, 11),
            (4, 5, 4),
            (5, 3, 4),
            (5, 1, 20),
        ] {
            caps[u * 6 + v] = c;
        }
        DenseMatrix::new(6, caps)
    }

    #[test]
    fn test_fifo() {
        for &global in &[true, false] {
            let m = network();
            let mut g = ResidualGraph::<u32, u32>::new(&m);
            let mut alg = Fifo::new(&mut g);
            alg.use_global_relabelling = global;
            alg.solve(0, 1);
            assert_eq!(alg.value(), 11);
            // a complete flow: no excess remains at inner vertices
            assert!((2..6).all(|u| alg.preflow.excess[u] == 0));
        }
    }
}
