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

//! Preflow data shared by the sequential push-relabel algorithms.

use crate::residual::ResidualGraph;
use crate::traits::{Capacity, Index};

use std::collections::VecDeque;

/// Excesses, heights and current arcs of a preflow.
pub(crate) struct Preflow<C> {
    /// The excess of each vertex.
    pub excess: Vec<C>,
    /// The height (distance label) of each vertex.
    pub height: Vec<usize>,
    /// The next arc to be considered for each vertex.
    pub current: Vec<usize>,
    /// The queue of vertices for a BFS.
    queue: VecDeque<usize>,
}

impl<C> Preflow<C>
where
    C: Capacity,
{
    pub fn new(n: usize) -> Self {
        Preflow {
            excess: vec![C::zero(); n],
            height: vec![0; n],
            current: vec![0; n],
            queue: VecDeque::with_capacity(n),
        }
    }

    /// Initialize the preflow.
    ///
    /// All arcs leaving the source are saturated, the source's height is set
    /// to `n`, all other heights are set to `0`.
    pub fn init<I: Index>(&mut self, g: &mut ResidualGraph<I, C>, src: usize) {
        let n = g.num_vertices();
        self.excess.fill(C::zero());
        self.height.fill(0);
        for u in 0..n {
            self.current[u] = g.arcs(u).start;
        }

        // send maximal flow out of source
        for a in g.arcs(src) {
            let df = g.residual(a);
            if !df.is_zero() {
                g.push(a, df);
                self.excess[g.head(a)] += df;
            }
        }

        self.height[src] = n;
    }

    /// Return `true` if `u` is a non-terminal with positive excess.
    #[inline]
    pub fn is_active(&self, u: usize, src: usize, snk: usize) -> bool {
        u != src && u != snk && !self.excess[u].is_zero()
    }

    /// Return `true` if arc `a` leaving `u` is admissible.
    #[inline]
    pub fn is_admissible<I: Index>(&self, g: &ResidualGraph<I, C>, u: usize, a: usize) -> bool {
        !g.residual(a).is_zero() && self.height[u] == self.height[g.head(a)] + 1
    }

    /// Push `df` units over arc `a` leaving `u`.
    ///
    /// Returns `true` if the head of `a` had no excess before.
    #[inline]
    pub fn push<I: Index>(&mut self, g: &mut ResidualGraph<I, C>, u: usize, a: usize, df: C) -> bool {
        debug_assert!(!df.is_zero() && df <= self.excess[u]);
        let v = g.head(a);
        g.push(a, df);
        self.excess[u] -= df;
        let was_zero = self.excess[v].is_zero();
        self.excess[v] += df;
        was_zero
    }

    /// Relabel `u` to one above its lowest residual neighbour.
    ///
    /// The current arc is reset to the first arc. Returns the new height.
    pub fn relabel<I: Index>(&mut self, g: &ResidualGraph<I, C>, u: usize) -> usize {
        let n = g.num_vertices();
        let h_new = g
            .arcs(u)
            .filter(|&a| !g.residual(a).is_zero())
            .map(|a| self.height[g.head(a)] + 1)
            .min()
            .unwrap_or(2 * n);
        debug_assert!(h_new > self.height[u]);
        self.height[u] = h_new;
        self.current[u] = g.arcs(u).start;
        h_new
    }

    /// Compute exact heights.
    ///
    /// Heights are the residual distances to the sink. If `two_phase` is
    /// `true`, vertices that cannot reach the sink get height `n` plus
    /// their residual distance to the source. All other vertices get height
    /// `2n`. The current arcs are reset.
    pub fn global_relabel<I: Index>(&mut self, g: &ResidualGraph<I, C>, src: usize, snk: usize, two_phase: bool) {
        let n = g.num_vertices();
        let unreached = 2 * n;

        self.height.fill(unreached);
        self.height[snk] = 0;
        self.height[src] = n;
        for u in 0..n {
            self.current[u] = g.arcs(u).start;
        }

        self.queue.clear();
        self.queue.push_back(snk);
        self.bfs(g, unreached);
        if two_phase {
            self.queue.push_back(src);
            self.bfs(g, unreached);
        }
    }

    /// Assign heights by a backward BFS from the vertices in the queue.
    ///
    /// Only vertices of height `unreached` are updated.
    fn bfs<I: Index>(&mut self, g: &ResidualGraph<I, C>, unreached: usize) {
        while let Some(v) = self.queue.pop_front() {
            let h = self.height[v] + 1;
            for a in g.arcs(v) {
                let u = g.head(a);
                if self.height[u] == unreached && !g.residual(g.mate(a)).is_zero() {
                    self.height[u] = h;
                    self.queue.push_back(u);
                }
            }
        }
    }
}
