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

//! The residual graph all algorithms work on.
//!
//! The residual graph is a flat arena of arcs. The arcs leaving vertex `u`
//! are stored at the positions `arcs(u)`, each arc knows its head and the
//! position of its paired reverse arc (its *mate*). Pushing `df` units over
//! arc `a` decreases the residual capacity of `a` and increases the residual
//! capacity of `mate(a)` by the same amount.
//!
//! For each pair of vertices `u < v` connected by an arc in either
//! direction there is exactly one pair of residual arcs. The residual
//! capacity of `u → v` starts at `c(u, v)`, the residual capacity of `v → u`
//! at `c(v, u)`.
//!
//! # Example
//!
//! ```
//! use rs_maxflow::{DenseMatrix, ResidualGraph};
//!
//! let m = DenseMatrix::<u32>::new(3, vec![0, 4, 0, 1, 0, 3, 0, 0, 0]);
//! let mut g = ResidualGraph::<u32, u32>::new(&m);
//! assert_eq!(g.num_vertices(), 3);
//! assert_eq!(g.num_arcs(), 4);
//!
//! let a = g.arcs(0).find(|&a| g.head(a) == 1).unwrap();
//! assert_eq!(g.residual(a), 4);
//! assert_eq!(g.residual(g.mate(a)), 1);
//!
//! g.push(a, 3);
//! assert_eq!(g.residual(a), 1);
//! assert_eq!(g.residual(g.mate(a)), 4);
//! ```

use crate::traits::{Capacity, Index, Network};

use std::collections::VecDeque;
use std::ops::Range;

/// The residual graph of a network.
#[derive(Clone, Debug)]
pub struct ResidualGraph<I, C> {
    /// The arcs of vertex `u` are `offsets[u]..offsets[u+1]`.
    offsets: Vec<usize>,
    /// The head of each arc.
    heads: Vec<I>,
    /// The position of the reverse arc of each arc.
    mates: Vec<I>,
    /// The current residual capacity of each arc.
    residual: Vec<C>,
}

impl<I, C> ResidualGraph<I, C>
where
    I: Index,
    C: Capacity,
{
    /// Build the residual graph of a network with zero flow.
    pub fn new<N>(g: &N) -> Self
    where
        N: Network<C>,
    {
        let n = g.num_vertices();

        // Is (u,v) the representative of its pair?
        let owns = |u: usize, v: usize| u < v || g.capacity(v, u).is_zero();

        let mut offsets = vec![0; n + 1];
        for u in 0..n {
            for (v, _) in g.out_arcs(u).filter(|&(v, _)| v != u && owns(u, v)) {
                offsets[u + 1] += 1;
                offsets[v + 1] += 1;
            }
        }
        for u in 0..n {
            offsets[u + 1] += offsets[u];
        }

        let m = offsets[n];
        let mut heads = vec![I::zero(); m];
        let mut mates = vec![I::zero(); m];
        let mut residual = vec![C::zero(); m];
        let mut next = offsets[..n].to_vec();

        for u in 0..n {
            for (v, c) in g.out_arcs(u).filter(|&(v, _)| v != u && owns(u, v)) {
                let a = next[u];
                let b = next[v];
                next[u] += 1;
                next[v] += 1;
                heads[a] = I::from_index(v);
                heads[b] = I::from_index(u);
                mates[a] = I::from_index(b);
                mates[b] = I::from_index(a);
                residual[a] = c;
                residual[b] = if u < v { g.capacity(v, u) } else { C::zero() };
            }
        }

        ResidualGraph {
            offsets,
            heads,
            mates,
            residual,
        }
    }

    /// Return the number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Return the number of residual arcs (two per arc pair).
    pub fn num_arcs(&self) -> usize {
        self.heads.len()
    }

    /// Return the positions of the arcs leaving `u`.
    #[inline]
    pub fn arcs(&self, u: usize) -> Range<usize> {
        self.offsets[u]..self.offsets[u + 1]
    }

    /// Return the head of arc `a`.
    #[inline]
    pub fn head(&self, a: usize) -> usize {
        self.heads[a].index()
    }

    /// Return the reverse arc of arc `a`.
    #[inline]
    pub fn mate(&self, a: usize) -> usize {
        self.mates[a].index()
    }

    /// Return the residual capacity of arc `a`.
    #[inline]
    pub fn residual(&self, a: usize) -> C {
        self.residual[a]
    }

    /// Send `df` units of flow over arc `a`.
    ///
    /// The residual capacity of `a` must be at least `df`.
    #[inline]
    pub fn push(&mut self, a: usize, df: C) {
        debug_assert!(self.residual[a] >= df);
        let b = self.mates[a].index();
        self.residual[a] -= df;
        self.residual[b] += df;
    }

    /// Return all residual capacities.
    pub fn residuals(&self) -> &[C] {
        &self.residual
    }

    /// Return all residual capacities for modification.
    ///
    /// The caller must keep the sum `residual(a) + residual(mate(a))` of
    /// each pair unchanged.
    pub(crate) fn residuals_mut(&mut self) -> &mut [C] {
        &mut self.residual
    }

    /// Return the largest residual capacity of an arc leaving `u`.
    pub fn max_residual(&self, u: usize) -> C {
        self.arcs(u).map(|a| self.residual[a]).max().unwrap_or_else(C::zero)
    }

    /// Return the source side of a minimum cut.
    ///
    /// These are the vertices from which `snk` cannot be reached in the
    /// residual graph, in increasing order. This is a minimum cut as soon
    /// as the current flow (or preflow) is maximal.
    pub fn min_cut(&self, snk: usize) -> Vec<usize> {
        let n = self.num_vertices();
        let mut reaches = vec![false; n];
        let mut queue = VecDeque::with_capacity(n);
        reaches[snk] = true;
        queue.push_back(snk);
        while let Some(v) = queue.pop_front() {
            for a in self.arcs(v) {
                let u = self.head(a);
                if !reaches[u] && !self.residual[self.mate(a)].is_zero() {
                    reaches[u] = true;
                    queue.push_back(u);
                }
            }
        }
        (0..n).filter(|&u| !reaches[u]).collect()
    }
}
