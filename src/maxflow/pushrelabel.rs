// Copyright (c) 2017-2022 Frank Fischer <frank-fischer@shadow-soft.de>
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

//! This module implements a push relabel algorithm for solving max flow problems.
//!
//! This implementation uses the highest-label selection rule together with
//! the gap heuristic and (optionally) the global relabelling heuristic.
//!
//! Only the first phase of the algorithm is run: vertices whose height
//! reaches `n` cannot send flow to the sink anymore and are not discharged.
//! The result is a maximum preflow, whose value is the excess of the sink.
//! The source side of a minimum cut can be obtained by
//! [`ResidualGraph::min_cut`].
//!
//! # Example
//!
//! ```
//! use rs_maxflow::{DenseMatrix, ResidualGraph};
//! use rs_maxflow::maxflow::PushRelabel;
//!
//! // s -> a -> t and s -> b -> a
//! let (s, a, b, t) = (0, 1, 2, 3);
//! let mut caps = vec![0u64; 16];
//! caps[s * 4 + a] = 2;
//! caps[s * 4 + b] = 7;
//! caps[b * 4 + a] = 7;
//! caps[a * 4 + t] = 4;
//! let m = DenseMatrix::new(4, caps);
//! let mut g = ResidualGraph::<u32, u64>::new(&m);
//!
//! let mut pr = PushRelabel::new(&mut g);
//! pr.solve(s, t);
//! assert_eq!(pr.value(), 4);
//! assert_eq!(g.min_cut(t), vec![s, a, b]);
//! ```

use super::preflow::Preflow;
use crate::residual::ResidualGraph;
use crate::traits::{Capacity, Index};

use std::cmp::min;

use tracing::trace;

const NONE: usize = usize::MAX;

/// The push-relabel algorithm.
///
/// This struct contains all algorithmic working data.
pub struct PushRelabel<'a, I, C> {
    /// The residual graph the flow problem is solved on.
    g: &'a mut ResidualGraph<I, C>,
    /// Excesses, heights and current arcs.
    preflow: Preflow<C>,
    /// The next active vertex in the linked list for the current height.
    next_act: Vec<usize>,
    /// The buckets containing the vertices of a specific height below `n`.
    buckets: Vec<Bucket>,
    /// The largest height of an active vertex.
    largest_act: usize,
    /// The flow value.
    value: C,
    /// The number of relabel operations performed during the algorithm.
    pub cnt_relabel: usize,
    /// The number of gaps found.
    pub cnt_gaps: usize,
    /// Whether to use the global relabelling heuristic.
    pub use_global_relabelling: bool,
}

/// A bucket containing vertices of some height.
#[derive(Clone)]
struct Bucket {
    /// The first active vertex of this height.
    ///
    /// The active vertices are kept in a singly linked list, this is the first
    /// vertex in that list.
    first_act: usize,
    /// Number of inactive vertices of this height.
    num_inact: usize,
}

impl Bucket {
    /// Returns `true` if the bucket is empty.
    ///
    /// This means that there are neither active nor inactive vertices of the
    /// buckets height.
    fn is_empty(&self) -> bool {
        self.first_act == NONE && self.num_inact == 0
    }

    fn clear(&mut self) {
        self.first_act = NONE;
        self.num_inact = 0;
    }
}

impl<'a, I, C> PushRelabel<'a, I, C>
where
    I: Index,
    C: Capacity,
{
    /// Return a new push-relabel algorithm data structure for the residual graph `g`.
    pub fn new(g: &'a mut ResidualGraph<I, C>) -> Self {
        let n = g.num_vertices();
        PushRelabel {
            g,
            preflow: Preflow::new(n),
            next_act: vec![NONE; n],
            buckets: vec![
                Bucket {
                    first_act: NONE,
                    num_inact: 0,
                };
                n
            ],
            largest_act: 0,
            value: C::zero(),
            cnt_relabel: 0,
            cnt_gaps: 0,
            use_global_relabelling: true,
        }
    }

    /// Return a reference to the underlying residual graph.
    pub fn as_graph(&self) -> &ResidualGraph<I, C> {
        self.g
    }

    /// Return the flow value.
    ///
    /// The function returns 0 if the flow has not been computed, yet.
    pub fn value(&self) -> C {
        self.value
    }

    /// Run the push-relabel algorithm from some source to some sink vertex.
    pub fn solve(&mut self, src: usize, snk: usize) {
        assert_ne!(src, snk, "Source and sink node must not be equal");

        let n = self.g.num_vertices();
        self.cnt_relabel = 0;
        self.cnt_gaps = 0;
        self.preflow.init(self.g, src);
        self.update_heights(src, snk);

        let mut lvl_relabel = if self.use_global_relabelling {
            n
        } else {
            usize::max_value()
        };

        while self.largest_act != 0 {
            let l = self.largest_act;
            let u = self.buckets[l].first_act;
            debug_assert_ne!(u, NONE);
            self.buckets[l].first_act = self.next_act[u];
            self.discharge(u, snk);
            if self.cnt_relabel >= lvl_relabel && self.largest_act != 0 {
                self.update_heights(src, snk);
                lvl_relabel = self.cnt_relabel + n;
            }
        }

        self.value = self.preflow.excess[snk];
        trace!(relabels = self.cnt_relabel, gaps = self.cnt_gaps, "highest-label push-relabel");
    }

    /// Compute exact labels by a BFS from the sink and refill the buckets.
    fn update_heights(&mut self, src: usize, snk: usize) {
        let n = self.g.num_vertices();
        self.preflow.global_relabel(self.g, src, snk, false);

        for b in &mut self.buckets {
            b.clear();
        }

        self.largest_act = 0;
        for u in 0..n {
            let h = self.preflow.height[u];
            if u == src || h >= n {
                continue;
            }
            if self.preflow.is_active(u, src, snk) {
                self.next_act[u] = self.buckets[h].first_act;
                self.buckets[h].first_act = u;
                self.largest_act = self.largest_act.max(h);
            } else {
                self.buckets[h].num_inact += 1;
            }
        }
    }

    /// Return the largest height `<= h` with an active vertex, 0 if there is none.
    fn find_largest_act(&self, h: usize) -> usize {
        (1..h + 1)
            .rev()
            .find(|&h| self.buckets[h].first_act != NONE)
            .unwrap_or(0)
    }

    /// Discharges vertex `u`.
    ///
    /// This function does a sequence of push and relabel operations for an
    /// active vertex `u` until its excess reaches 0, or its height reaches
    /// `n`. In the latter case `u` is disconnected from the sink and will
    /// not be considered again.
    fn discharge(&mut self, u: usize, snk: usize) {
        let end = self.g.arcs(u).end;

        loop {
            let h_u = self.preflow.height[u];
            let mut cur = self.preflow.current[u];

            while cur < end {
                if self.preflow.is_admissible(self.g, u, cur) {
                    let v = self.g.head(cur);
                    let df = min(self.preflow.excess[u], self.g.residual(cur));

                    if v != snk && self.preflow.excess[v].is_zero() {
                        // v becomes active
                        let h = self.preflow.height[v];
                        self.next_act[v] = self.buckets[h].first_act;
                        self.buckets[h].first_act = v;
                        debug_assert!(self.buckets[h].num_inact > 0);
                        self.buckets[h].num_inact -= 1;
                    }

                    self.preflow.push(self.g, u, cur, df);

                    // check if vertex is fully discharged
                    if self.preflow.excess[u].is_zero() {
                        self.buckets[h_u].num_inact += 1;
                        self.largest_act = self.find_largest_act(h_u);
                        // save current arc
                        self.preflow.current[u] = cur;
                        return;
                    }
                }
                cur += 1;
            }

            // we ran out of admissible arcs but vertex still has positive excess
            if !self.relabel(u) {
                break;
            }
        }
    }

    /// The relabel operation.
    ///
    /// The function returns `true` iff the vertex remains active, i.e. its
    /// new height is below `n`.
    fn relabel(&mut self, u: usize) -> bool {
        debug_assert!(!self.preflow.excess[u].is_zero());
        self.cnt_relabel += 1;

        let n = self.g.num_vertices();
        let h_old = self.preflow.height[u];
        let mut h_new = self.preflow.relabel(self.g, u);

        // *** The GAP heuristic ***
        //
        // If `u` was the last vertex of its height, no vertex above can
        // reach the sink anymore.
        if self.buckets[h_old].is_empty() {
            self.cnt_gaps += 1;
            for b in &mut self.buckets[h_old + 1..] {
                b.clear();
            }
            for h in &mut self.preflow.height {
                if h_old < *h && *h < n {
                    *h = n + 1;
                }
            }
            h_new = n + 1;
            self.preflow.height[u] = h_new;
        }

        if h_new >= n {
            // too large for phase I, look for the next active vertex
            self.largest_act = self.find_largest_act(h_old);
            return false;
        }

        // The vertex remains active, it must have the largest height now.
        self.largest_act = h_new;
        true
    }
}

/// Solve the maxflow problem using the highest-label push-relabel algorithm.
///
/// The function returns the flow value from `src` to `snk`.
pub fn pushrelabel<I, C>(g: &mut ResidualGraph<I, C>, src: usize, snk: usize) -> C
where
    I: Index,
    C: Capacity,
{
    let mut maxflow = PushRelabel::new(g);
    maxflow.solve(src, snk);
    maxflow.value()
}

#[cfg(test)]
mod tests {
    use super::PushRelabel;
    use crate::{DenseMatrix, ResidualGraph};

    #[test]
    fn test_pushrelabel() {
        let (s, t, v1, v2, v3, v4) = (0, 1, 2, 3, 4, 5);
        let mut caps = vec![0u32; 36];
        for &(u, v, c) in &[
            (s, v1, 15),
            (s, v3, 10),
            (v1, v2, 6),
            (v1, v3, 7),
            (v2, t, 5),
            (v2, v4, 2),
            (v3, v2, 11),
            (v3, v4, 4),
            (v4, v2, 4),
            (v4, t, 20),
        ] {
            caps[u * 6 + v] = c;
        }
        let m = DenseMatrix::new(6, caps);

        for &global in &[true, false] {
            let mut g = ResidualGraph::<u32, u32>::new(&m);
            let mut pr = PushRelabel::new(&mut g);
            pr.use_global_relabelling = global;
            pr.solve(s, t);
            assert_eq!(pr.value(), 11);
            let cut = g.min_cut(t);
            assert!(cut.contains(&s) && !cut.contains(&t));
        }
    }

    #[test]
    fn test_dead_end() {
        // the only arc leaving the source leads into a dead end
        let n = 8;
        let mut caps = vec![0u32; n * n];
        caps[1] = 1;
        for u in 1..n - 1 {
            caps[u * n + u + 1] = 100;
            caps[(u + 1) * n + u] = 100;
        }
        caps[2 * n + 1] = 0;
        caps[2 * n + 3] = 0;
        caps[3 * n + 2] = 0;
        let m = DenseMatrix::new(n, caps);
        let mut g = ResidualGraph::<u32, u32>::new(&m);
        let mut pr = PushRelabel::new(&mut g);
        pr.solve(0, n - 1);
        assert_eq!(pr.value(), 0);
    }
}
