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

//! Excess scaling with one contiguous vertex segment per thread.
//!
//! All workers share the scale `Δ = 2^k`. In each round a worker
//! discharges the large vertices of its segment in order of increasing
//! height. A push never raises the excess of a non-terminal above `Δ`,
//! the receiving excess is reserved atomically for vertices that other
//! workers may push to as well. The leader halves `Δ` once no large vertex
//! is left and stops after the round with `Δ = 1`.

use super::{Discharge, Rounds, SharedPreflow};
use crate::error::Result;
use crate::options::Options;
use crate::traits::{Capacity, Index};

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU32, Ordering};

use rayon::ThreadPool;
use tracing::trace;

pub(super) fn solve<I, C>(shared: &SharedPreflow<I, C>, pool: &ThreadPool, opts: &Options) -> Result<()>
where
    I: Index,
    C: Capacity,
{
    let max_excess = shared.max_excess();
    if max_excess == 0 {
        return Ok(());
    }
    let scale = AtomicU32::new(max_excess.next_power_of_two().trailing_zeros());
    let n = shared.num_vertices();
    let rounds = Rounds::new(pool.current_num_threads(), n, opts.global_relabelling);
    pool.broadcast(|ctx| worker(shared, ctx.index(), &rounds, &scale));
    trace!(
        rounds = rounds.count(),
        relabels = rounds.relabels(),
        segments = shared.num_segments(),
        "segmented excess scaling"
    );
    Ok(())
}

/// The work loop of the worker owning segment `k`.
fn worker<I, C>(shared: &SharedPreflow<I, C>, k: usize, rounds: &Rounds, scale: &AtomicU32)
where
    I: Index,
    C: Capacity,
{
    let n = shared.num_vertices();
    let seg = shared.segment(k);
    let mut heap = BinaryHeap::new();
    let mut listed = vec![false; seg.len()];

    loop {
        let delta = 1u128 << scale.load(Ordering::Relaxed);
        for u in seg.clone() {
            if shared.is_large(u, delta) {
                listed[u - seg.start] = true;
                heap.push(Reverse((shared.height(u), u)));
            }
        }

        let mut relabels = 0;
        while let Some(Reverse((_, u))) = heap.pop() {
            listed[u - seg.start] = false;
            let outcome = shared.discharge_scaled(u, delta, |v| {
                if seg.contains(&v) && !listed[v - seg.start] && shared.is_large(v, delta) {
                    listed[v - seg.start] = true;
                    heap.push(Reverse((shared.height(v), v)));
                }
            });
            if outcome == Discharge::Relabelled {
                relabels += 1;
                if shared.is_large(u, delta) {
                    listed[u - seg.start] = true;
                    heap.push(Reverse((shared.height(u), u)));
                }
            }
        }

        let done = rounds.end_round(relabels, || {
            if rounds.relabel_due(n) {
                shared.global_relabel();
            }
            if (0..n).any(|u| shared.is_large(u, delta)) {
                return false;
            }
            match scale.load(Ordering::Relaxed) {
                0 => true,
                e => {
                    scale.store(e - 1, Ordering::Relaxed);
                    false
                }
            }
        });
        if done {
            return;
        }
    }
}
