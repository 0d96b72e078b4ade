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

//! Push-relabel with one contiguous vertex segment per thread.
//!
//! Each worker discharges the active vertices of its own segment in FIFO
//! order until none is left. Flow pushed into another segment is picked up
//! by that segment's worker in the next round. After every round the leader
//! checks for termination and may relabel globally.

use super::{Rounds, SharedPreflow};
use crate::error::Result;
use crate::options::Options;
use crate::traits::{Capacity, Index};

use std::collections::VecDeque;

use rayon::ThreadPool;
use tracing::trace;

pub(super) fn solve<I, C>(shared: &SharedPreflow<I, C>, pool: &ThreadPool, opts: &Options) -> Result<()>
where
    I: Index,
    C: Capacity,
{
    let n = shared.num_vertices();
    let rounds = Rounds::new(pool.current_num_threads(), n, opts.global_relabelling);
    pool.broadcast(|ctx| worker(shared, ctx.index(), &rounds));
    trace!(
        rounds = rounds.count(),
        relabels = rounds.relabels(),
        segments = shared.num_segments(),
        "segmented push-relabel"
    );
    Ok(())
}

/// The work loop of the worker owning segment `k`.
fn worker<I, C>(shared: &SharedPreflow<I, C>, k: usize, rounds: &Rounds)
where
    I: Index,
    C: Capacity,
{
    let n = shared.num_vertices();
    let seg = shared.segment(k);
    let mut queue = VecDeque::with_capacity(seg.len());
    let mut queued = vec![false; seg.len()];

    loop {
        for u in seg.clone() {
            if shared.is_active(u) && !queued[u - seg.start] {
                queued[u - seg.start] = true;
                queue.push_back(u);
            }
        }

        let mut relabels = 0;
        while let Some(u) = queue.pop_front() {
            queued[u - seg.start] = false;
            relabels += shared.discharge(u, |v| {
                if seg.contains(&v) && !queued[v - seg.start] {
                    queued[v - seg.start] = true;
                    queue.push_back(v);
                }
            });
        }

        let done = rounds.end_round(relabels, || {
            if rounds.relabel_due(n) {
                shared.global_relabel();
            }
            !(0..n).any(|u| shared.is_active(u))
        });
        if done {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::maxflow::parallel::segment;
    use crate::{Options, ResidualGraph, SparseMatrix};

    #[test]
    fn test_cross_segments() {
        // a zigzag between the first and the second half of the vertices
        let n = 8;
        let mut arcs = vec![(0, 4, 9), (4, 1, 7), (1, 5, 6), (5, 2, 8), (2, 6, 5), (6, 3, 9), (3, 7, 9)];
        arcs.push((0, 7, 1));
        let m = SparseMatrix::<u32, u64>::from_triplets(n, arcs);
        for threads in 1..=n + 1 {
            let opts = Options::default().with_threads(threads);
            let mut g = ResidualGraph::<u32, u64>::new(&m);
            assert_eq!(segment(&mut g, 0, 7, &opts).unwrap(), 6);
            assert_eq!(g.min_cut(7), vec![0, 1, 2, 4, 5]);
        }
    }
}
