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

//! Shared-memory parallel push-relabel algorithms.
//!
//! All three variants work on a [`SharedPreflow`]: residual capacities,
//! excesses and heights are stored in atomics. Each active vertex is
//! discharged by exactly one worker at a time (its *owner* in the current
//! round), so only the owner decreases the excess of a vertex, the residual
//! capacity of the arcs leaving it, and changes its height. Other workers
//! only increase these values by pushing flow towards the vertex.
//!
//! A discharge uses the lock-free step of Hong: push to the lowest
//! residual neighbour if it is lower than the vertex, otherwise relabel the
//! vertex to one above that neighbour. This remains correct if a
//! neighbour's height is read while it is being changed.
//!
//! The algorithms stop after the first phase: vertices with height at
//! least `n` are not discharged. The value is the excess of the sink.
//!
//! Workers synchronize in rounds. Between two rounds a single thread may
//! recompute all heights by a BFS from the sink (global relabelling).
//!
//! In the segmented variants each worker owns a contiguous range of
//! vertices. Arcs inside a segment and excesses of vertices without arcs
//! to other segments are only touched by one worker and are updated
//! without read-modify-write operations.

use crate::error::Result;
use crate::num::integer::Integer;
use crate::options::Options;
use crate::residual::ResidualGraph;
use crate::traits::{Capacity, Index};

use std::cmp::min;
use std::collections::VecDeque;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Barrier;

use rayon::{ThreadPool, ThreadPoolBuilder};

mod ahujaorlin;
mod pushrelabel;
mod segment;

/// Solve the maxflow problem with synchronous rounds over all active vertices.
///
/// Each round the active vertices are split into `opts.threads` shards
/// which are discharged in parallel.
pub fn pushrelabel<I, C>(g: &mut ResidualGraph<I, C>, src: usize, snk: usize, opts: &Options) -> Result<C>
where
    I: Index,
    C: Capacity,
{
    run(g, src, snk, opts, false, pushrelabel::solve)
}

/// Solve the maxflow problem with one vertex segment per thread.
pub fn segment<I, C>(g: &mut ResidualGraph<I, C>, src: usize, snk: usize, opts: &Options) -> Result<C>
where
    I: Index,
    C: Capacity,
{
    run(g, src, snk, opts, true, segment::solve)
}

/// Solve the maxflow problem by excess scaling with one vertex segment per thread.
pub fn ahujaorlin<I, C>(g: &mut ResidualGraph<I, C>, src: usize, snk: usize, opts: &Options) -> Result<C>
where
    I: Index,
    C: Capacity,
{
    run(g, src, snk, opts, true, ahujaorlin::solve)
}

/// Run a parallel algorithm and write the final residual capacities back.
fn run<I, C, F>(
    g: &mut ResidualGraph<I, C>,
    src: usize,
    snk: usize,
    opts: &Options,
    segmented: bool,
    solve: F,
) -> Result<C>
where
    I: Index,
    C: Capacity,
    F: FnOnce(&SharedPreflow<I, C>, &ThreadPool, &Options) -> Result<()>,
{
    opts.validate()?;
    let threads = opts.threads.min(g.num_vertices());
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("maxflow-{}", i))
        .build()?;

    let (value, residual) = {
        let partition = if segmented {
            Some(Partition::new(g, threads))
        } else {
            None
        };
        let shared = SharedPreflow::new(g, src, snk, partition);
        solve(&shared, &pool, opts)?;
        shared.into_parts()
    };
    g.residuals_mut().copy_from_slice(&residual);
    Ok(value)
}

/// A partition of the vertices into contiguous segments.
pub(crate) struct Partition {
    /// The number of vertices per segment (the last one may be smaller).
    chunk: usize,
    /// Whether a vertex has an arc to another segment.
    boundary: Vec<bool>,
}

impl Partition {
    fn new<I: Index, C: Capacity>(g: &ResidualGraph<I, C>, threads: usize) -> Self {
        let n = g.num_vertices();
        let chunk = Integer::div_ceil(&n, &threads.max(1));
        let boundary = (0..n)
            .map(|u| g.arcs(u).any(|a| g.head(a) / chunk != u / chunk))
            .collect();
        Partition { chunk, boundary }
    }

    /// Return the number of segments.
    pub fn num_segments(&self) -> usize {
        Integer::div_ceil(&self.boundary.len(), &self.chunk)
    }

    /// Return the vertices of segment `k`.
    pub fn segment(&self, k: usize) -> Range<usize> {
        let n = self.boundary.len();
        min(k * self.chunk, n)..min((k + 1) * self.chunk, n)
    }

    #[inline]
    fn same_segment(&self, u: usize, v: usize) -> bool {
        u / self.chunk == v / self.chunk
    }
}

/// Synchronization of workers that run in rounds.
///
/// Every worker of the pool calls [`Rounds::end_round`] after its local
/// work. One of them (the leader) then runs a sequential step while the
/// others wait.
pub(crate) struct Rounds {
    barrier: Barrier,
    done: AtomicBool,
    count: AtomicUsize,
    relabels: AtomicUsize,
    lvl_relabel: AtomicUsize,
}

impl Rounds {
    /// Create the state for `workers` workers.
    ///
    /// If `global_relabelling` is set, a global relabelling is due after
    /// every `n` relabel operations.
    pub fn new(workers: usize, n: usize, global_relabelling: bool) -> Self {
        Rounds {
            barrier: Barrier::new(workers),
            done: AtomicBool::new(false),
            count: AtomicUsize::new(0),
            relabels: AtomicUsize::new(0),
            lvl_relabel: AtomicUsize::new(if global_relabelling { n } else { usize::max_value() }),
        }
    }

    /// Finish the current round of a worker that did `relabels` relabel operations.
    ///
    /// The leader runs `step`, which returns `true` if the algorithm is
    /// done. Returns the leader's decision to every worker.
    pub fn end_round<F>(&self, relabels: usize, step: F) -> bool
    where
        F: FnOnce() -> bool,
    {
        self.relabels.fetch_add(relabels, Ordering::Relaxed);
        if self.barrier.wait().is_leader() {
            self.count.fetch_add(1, Ordering::Relaxed);
            self.done.store(step(), Ordering::Relaxed);
        }
        self.barrier.wait();
        self.done.load(Ordering::Relaxed)
    }

    /// Return `true` if a global relabelling is due (leader only).
    pub fn relabel_due(&self, n: usize) -> bool {
        let total = self.relabels.load(Ordering::Relaxed);
        if total >= self.lvl_relabel.load(Ordering::Relaxed) {
            self.lvl_relabel.store(total + n, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Return the number of finished rounds.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    /// Return the total number of relabel operations.
    pub fn relabels(&self) -> usize {
        self.relabels.load(Ordering::Relaxed)
    }
}

/// The result of a scaled discharge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Discharge {
    /// The vertex is not large (or not active) anymore.
    Done,
    /// The vertex has been relabelled.
    Relabelled,
    /// The lowest neighbour cannot receive more flow in this scaling phase.
    Blocked,
}

/// A preflow stored in atomics.
pub(crate) struct SharedPreflow<'g, I, C: Capacity> {
    /// The arc structure (the residual capacities in `g` are not used).
    g: &'g ResidualGraph<I, C>,
    residual: Vec<C::Atomic>,
    excess: Vec<C::Atomic>,
    height: Vec<AtomicUsize>,
    partition: Option<Partition>,
    src: usize,
    snk: usize,
}

impl<'g, I, C> SharedPreflow<'g, I, C>
where
    I: Index,
    C: Capacity,
{
    /// Create the initial preflow.
    ///
    /// All arcs leaving the source are saturated and the heights are the
    /// exact distances to the sink.
    fn new(g: &'g ResidualGraph<I, C>, src: usize, snk: usize, partition: Option<Partition>) -> Self {
        let n = g.num_vertices();
        let mut residual = g.residuals().to_vec();
        let mut excess = vec![C::zero(); n];
        for a in g.arcs(src) {
            let df = residual[a];
            residual[a] = C::zero();
            residual[g.mate(a)] += df;
            excess[g.head(a)] += df;
        }

        let shared = SharedPreflow {
            g,
            residual: residual.into_iter().map(C::new_atomic).collect(),
            excess: excess.into_iter().map(C::new_atomic).collect(),
            height: (0..n).map(|_| AtomicUsize::new(0)).collect(),
            partition,
            src,
            snk,
        };
        shared.global_relabel();
        shared
    }

    /// Return the flow value and the final residual capacities.
    fn into_parts(self) -> (C, Vec<C>) {
        let value = C::load(&self.excess[self.snk], Ordering::Acquire);
        (value, self.residual.into_iter().map(C::into_inner).collect())
    }

    pub fn num_vertices(&self) -> usize {
        self.g.num_vertices()
    }

    /// Return the number of vertex segments (1 if the vertices are not partitioned).
    pub fn num_segments(&self) -> usize {
        self.partition.as_ref().map_or(1, Partition::num_segments)
    }

    /// Return the vertices of segment `k`.
    pub fn segment(&self, k: usize) -> Range<usize> {
        match self.partition {
            Some(ref p) => p.segment(k),
            None if k == 0 => 0..self.num_vertices(),
            None => 0..0,
        }
    }

    #[inline]
    pub fn height(&self, u: usize) -> usize {
        self.height[u].load(Ordering::Acquire)
    }

    #[inline]
    pub fn excess(&self, u: usize) -> C {
        C::load(&self.excess[u], Ordering::Acquire)
    }

    /// Return `true` if `u` is a non-terminal with positive excess and height below `n`.
    #[inline]
    pub fn is_active(&self, u: usize) -> bool {
        u != self.src && u != self.snk && self.height(u) < self.num_vertices() && !self.excess(u).is_zero()
    }

    /// Return `true` if `u` is active with excess larger than `delta / 2`.
    #[inline]
    pub fn is_large(&self, u: usize, delta: u128) -> bool {
        self.is_active(u) && 2 * self.excess(u).widen() > delta
    }

    /// Return the largest excess of a vertex.
    pub fn max_excess(&self) -> u128 {
        (0..self.num_vertices())
            .filter(|&u| u != self.src && u != self.snk)
            .map(|u| self.excess(u).widen())
            .max()
            .unwrap_or(0)
    }

    /// Return `true` if the arc `u → v` is only touched by one worker.
    #[inline]
    fn is_local_arc(&self, u: usize, v: usize) -> bool {
        self.partition.as_ref().map_or(false, |p| p.same_segment(u, v))
    }

    /// Return `true` if the excess of `u` is only touched by one worker.
    #[inline]
    fn is_local_vertex(&self, u: usize) -> bool {
        self.partition.as_ref().map_or(false, |p| !p.boundary[u])
    }

    #[inline]
    fn residual(&self, a: usize) -> C {
        C::load(&self.residual[a], Ordering::Acquire)
    }

    #[inline]
    fn add(cell: &C::Atomic, local: bool, df: C) {
        if local {
            C::store(cell, C::load(cell, Ordering::Relaxed) + df, Ordering::Relaxed);
        } else {
            C::fetch_add(cell, df, Ordering::AcqRel);
        }
    }

    #[inline]
    fn sub(cell: &C::Atomic, local: bool, df: C) {
        if local {
            C::store(cell, C::load(cell, Ordering::Relaxed) - df, Ordering::Relaxed);
        } else {
            C::fetch_sub(cell, df, Ordering::AcqRel);
        }
    }

    /// Find the residual arc from `u` to a neighbour of smallest height.
    ///
    /// Returns the arc, its head and the head's height.
    fn lowest_neighbour(&self, u: usize) -> Option<(usize, usize, usize)> {
        let mut best: Option<(usize, usize, usize)> = None;
        for a in self.g.arcs(u) {
            if self.residual(a).is_zero() {
                continue;
            }
            let v = self.g.head(a);
            let h = self.height(v);
            if best.map_or(true, |(_, _, hb)| h < hb) {
                best = Some((a, v, h));
            }
        }
        best
    }

    /// Move `df` units over arc `a = (u, v)`, except the excess of `v`.
    #[inline]
    fn move_flow(&self, u: usize, a: usize, v: usize, df: C) {
        let local = self.is_local_arc(u, v);
        Self::sub(&self.residual[a], local, df);
        Self::add(&self.residual[self.g.mate(a)], local, df);
        Self::sub(&self.excess[u], self.is_local_vertex(u), df);
    }

    /// Discharge the active vertex `u` owned by the calling worker.
    ///
    /// `pushed(v)` is called after each push to a non-terminal `v`. Returns
    /// the number of relabel operations.
    pub fn discharge<F>(&self, u: usize, mut pushed: F) -> usize
    where
        F: FnMut(usize),
    {
        let n = self.num_vertices();
        let mut relabels = 0;
        loop {
            let e = self.excess(u);
            let h = self.height(u);
            if e.is_zero() || h >= n {
                return relabels;
            }
            let (a, v, hv) = match self.lowest_neighbour(u) {
                Some(best) => best,
                None => {
                    // cannot happen for a vertex with excess, drop it
                    self.height[u].store(n, Ordering::Release);
                    return relabels;
                }
            };
            if h > hv {
                let df = min(e, self.residual(a));
                self.move_flow(u, a, v, df);
                Self::add(&self.excess[v], self.is_local_vertex(v), df);
                if v != self.src && v != self.snk {
                    pushed(v);
                }
            } else {
                self.height[u].store(hv + 1, Ordering::Release);
                relabels += 1;
            }
        }
    }

    /// Discharge the large vertex `u` w.r.t. the scale `delta`.
    ///
    /// Pushes never raise the excess of a non-terminal above `delta`. The
    /// discharge stops after a relabel, so that the caller can keep vertices
    /// of smaller height first.
    pub fn discharge_scaled<F>(&self, u: usize, delta: u128, mut pushed: F) -> Discharge
    where
        F: FnMut(usize),
    {
        loop {
            if !self.is_large(u, delta) {
                return Discharge::Done;
            }
            let h = self.height(u);
            let (a, v, hv) = match self.lowest_neighbour(u) {
                Some(best) => best,
                None => {
                    self.height[u].store(self.num_vertices(), Ordering::Release);
                    return Discharge::Done;
                }
            };
            if h <= hv {
                self.height[u].store(hv + 1, Ordering::Release);
                return Discharge::Relabelled;
            }

            let want = min(self.excess(u), self.residual(a));
            let df = if v == self.src || v == self.snk {
                Self::add(&self.excess[v], self.is_local_vertex(v), want);
                want
            } else {
                self.reserve(v, want, delta)
            };
            if df.is_zero() {
                return Discharge::Blocked;
            }
            self.move_flow(u, a, v, df);
            if v != self.src && v != self.snk {
                pushed(v);
            }
        }
    }

    /// Raise the excess of `v` by at most `want`, but not above `delta`.
    ///
    /// Returns the amount actually added.
    fn reserve(&self, v: usize, want: C, delta: u128) -> C {
        let room = |x: C| min(want, C::narrow_saturating(delta.saturating_sub(x.widen())));
        if self.is_local_vertex(v) {
            let x = C::load(&self.excess[v], Ordering::Relaxed);
            let df = room(x);
            C::store(&self.excess[v], x + df, Ordering::Relaxed);
            df
        } else {
            let mut df = C::zero();
            let _ = C::fetch_update(&self.excess[v], |x| {
                df = room(x);
                if df.is_zero() {
                    None
                } else {
                    Some(x + df)
                }
            });
            df
        }
    }

    /// Recompute all heights by a BFS from the sink.
    ///
    /// Must only be called while no worker is discharging. Heights never
    /// decrease, vertices that cannot reach the sink get at least height `n`.
    pub fn global_relabel(&self) {
        let n = self.num_vertices();
        let mut dist = vec![usize::max_value(); n];
        let mut queue = VecDeque::with_capacity(n);
        dist[self.snk] = 0;
        dist[self.src] = n;
        queue.push_back(self.snk);
        while let Some(v) = queue.pop_front() {
            for a in self.g.arcs(v) {
                let u = self.g.head(a);
                if dist[u] == usize::max_value() && !self.residual(self.g.mate(a)).is_zero() {
                    dist[u] = dist[v] + 1;
                    queue.push_back(u);
                }
            }
        }
        for (u, d) in dist.into_iter().enumerate() {
            let h = if d == usize::max_value() { n } else { d };
            self.height[u].fetch_max(h, Ordering::AcqRel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Partition, SharedPreflow};
    use crate::{DenseMatrix, ResidualGraph};

    #[test]
    fn test_partition() {
        // path 0 - 1 - 2 - 3 - 4
        let mut caps = vec![0u32; 25];
        for u in 0..4 {
            caps[u * 5 + u + 1] = 1;
        }
        let m = DenseMatrix::new(5, caps);
        let g = ResidualGraph::<u32, u32>::new(&m);
        let p = Partition::new(&g, 2);
        assert_eq!(p.num_segments(), 2);
        assert_eq!(p.segment(0), 0..3);
        assert_eq!(p.segment(1), 3..5);
        assert_eq!(p.boundary, vec![false, false, true, true, false]);

        let p = Partition::new(&g, 5);
        assert_eq!(p.num_segments(), 5);
        assert!(p.boundary.iter().all(|&b| b));
    }

    #[test]
    fn test_initial_preflow() {
        let m = DenseMatrix::<u64>::new(3, vec![0, 6, 2, 0, 0, 3, 0, 0, 0]);
        let g = ResidualGraph::<u32, u64>::new(&m);
        let shared = SharedPreflow::new(&g, 0, 2, None);
        assert_eq!(shared.excess(1), 6);
        assert_eq!(shared.excess(2), 2);
        assert_eq!(shared.height(0), 3);
        assert_eq!(shared.height(1), 1);
        assert_eq!(shared.height(2), 0);
        assert!(shared.is_active(1));
        assert!(!shared.is_active(2));
        assert_eq!(shared.max_excess(), 6);

        let relabels = shared.discharge(1, |_| ());
        assert_eq!(relabels, 1);
        assert_eq!(shared.excess(2), 5);
        assert!(!shared.is_active(1));
        let (value, residual) = shared.into_parts();
        assert_eq!(value, 5);
        assert_eq!(residual.len(), g.num_arcs());
    }
}
